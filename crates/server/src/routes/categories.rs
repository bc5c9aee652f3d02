// crates/server/src/routes/categories.rs
//! Category listing and creation.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use taskmarket_core::Category;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
}

/// GET /api/categories — all categories, alphabetical.
pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.db.list_categories().await?))
}

/// POST /api/categories
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCategoryRequest>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".into()));
    }

    let category = Category {
        id: Uuid::new_v4().to_string(),
        name: req.name,
    };
    match state.db.insert_category(&category).await {
        Ok(()) => {}
        Err(e) if e.is_unique_violation() => {
            return Err(ApiError::Conflict("category already exists".into()));
        }
        Err(e) => return Err(e.into()),
    }

    Ok((StatusCode::CREATED, Json(category)))
}

/// Build the categories router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/categories", get(list).post(create))
}
