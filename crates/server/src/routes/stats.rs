// crates/server/src/routes/stats.rs
//! Dashboard stats endpoints. The shape of the response depends on the
//! caller's role.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use taskmarket_core::Role;
use taskmarket_db::{ActivityEntry, CustomerStats, ProviderStats};

use crate::error::ApiResult;
use crate::state::AppState;

/// Query params for GET /api/stats and GET /api/stats/activity.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    pub user_id: String,
    pub role: Role,
}

/// Role-dependent stats payload.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum StatsResponse {
    Customer(CustomerStats),
    Provider(ProviderStats),
}

/// GET /api/stats?userId=...&role=CUSTOMER|PROVIDER
pub async fn user_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatsQuery>,
) -> ApiResult<Json<StatsResponse>> {
    let stats = match query.role {
        Role::Customer => StatsResponse::Customer(state.db.customer_stats(&query.user_id).await?),
        Role::Provider => StatsResponse::Provider(state.db.provider_stats(&query.user_id).await?),
    };
    Ok(Json(stats))
}

/// GET /api/stats/activity?userId=...&role=... — five most recent jobs.
pub async fn activity(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatsQuery>,
) -> ApiResult<Json<Vec<ActivityEntry>>> {
    let entries = state
        .db
        .recent_activity(&query.user_id, query.role == Role::Provider)
        .await?;
    Ok(Json(entries))
}

/// Build the stats router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stats", get(user_stats))
        .route("/stats/activity", get(activity))
}
