// crates/server/src/routes/ratings.rs
//! Rating endpoints.
//!
//! A customer rates the provider once per completed job. Each new rating
//! refreshes the provider's denormalized average, which is what the bid
//! ranking reads.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use taskmarket_core::{JobStatus, Rating, TransitionError};

use crate::error::{ApiError, ApiResult};
use crate::state::{now_ms, AppState};

/// Body for POST /api/ratings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRatingRequest {
    pub job_id: String,
    pub customer_id: String,
    pub score: i64,
    #[serde(default)]
    pub comment: Option<String>,
}

/// POST /api/ratings — customer rates the provider after completion.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitRatingRequest>,
) -> ApiResult<(StatusCode, Json<Rating>)> {
    if !(1..=5).contains(&req.score) {
        return Err(ApiError::BadRequest("score must be between 1 and 5".into()));
    }

    let job = state
        .db
        .get_job(&req.job_id)
        .await?
        .ok_or_else(|| ApiError::JobNotFound(req.job_id.clone()))?;

    if job.customer_id != req.customer_id {
        return Err(TransitionError::NotJobOwner.into());
    }
    if job.status != JobStatus::Completed {
        return Err(ApiError::BadRequest(
            "only completed jobs can be rated".into(),
        ));
    }
    let provider_id = job
        .provider_id
        .ok_or_else(|| ApiError::BadRequest("job has no assigned provider".into()))?;

    if state.db.find_rating(&job.id, &provider_id).await?.is_some() {
        return Err(ApiError::Conflict("job already rated".into()));
    }

    let rating = Rating {
        id: Uuid::new_v4().to_string(),
        job_id: req.job_id,
        provider_id: provider_id.clone(),
        score: req.score,
        comment: req.comment,
        created_at: now_ms(),
    };
    // The unique (job, provider) index backstops the check above under
    // concurrent submissions.
    match state.db.insert_rating(&rating).await {
        Ok(()) => {}
        Err(e) if e.is_unique_violation() => {
            return Err(ApiError::Conflict("job already rated".into()));
        }
        Err(e) => return Err(e.into()),
    }
    state.db.refresh_provider_rating(&provider_id).await?;

    tracing::info!(job_id = %rating.job_id, provider_id = %provider_id, score = rating.score, "Rating recorded");
    Ok((StatusCode::CREATED, Json(rating)))
}

/// GET /api/providers/{id}/ratings — a provider's ratings, newest first.
pub async fn list_for_provider(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Rating>>> {
    Ok(Json(state.db.list_ratings_for_provider(&id).await?))
}

/// Build the ratings router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ratings", post(submit))
        .route("/providers/{id}/ratings", get(list_for_provider))
}
