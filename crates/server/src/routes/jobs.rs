// crates/server/src/routes/jobs.rs
//! Job creation and lifecycle endpoints.
//!
//! Every mutation follows the same shape: load a snapshot, validate the
//! transition in `taskmarket-core` (precise Forbidden/NotFound errors), then
//! apply the resulting patch through the storage compare-and-swap. A CAS
//! that matches zero rows means a concurrent caller transitioned the job
//! first and surfaces as 403.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use taskmarket_core::{
    cancel_job, claim_instant_book, complete_job, create_job, BookingMode, Job, JobDraft,
    TransitionError,
};
use taskmarket_db::JobWithBidCount;

use crate::error::{ApiError, ApiResult};
use crate::state::{now_ms, AppState};

/// Body for POST /api/jobs.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub customer_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category_id: String,
    pub booking_mode: BookingMode,
    pub price: f64,
    #[serde(default)]
    pub accept_price: Option<f64>,
}

/// Body for the provider-identified transitions (claim, complete).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderAction {
    pub provider_id: String,
}

/// Body for POST /api/jobs/{id}/cancel.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelAction {
    pub caller_id: String,
}

/// POST /api/jobs — customer posts a job.
///
/// Instant-book jobs come back with `acceptUntil` set 30 seconds out.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateJobRequest>,
) -> ApiResult<(StatusCode, Json<Job>)> {
    if req.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title must not be empty".into()));
    }
    if !req.price.is_finite() || req.price < 0.0 {
        return Err(ApiError::BadRequest("price must be a non-negative number".into()));
    }

    let job = create_job(
        &req.customer_id,
        JobDraft {
            title: req.title,
            description: req.description,
            category_id: req.category_id,
            booking_mode: req.booking_mode,
            price: req.price,
            accept_price: req.accept_price,
        },
        now_ms(),
    );
    state.db.insert_job(&job).await?;

    tracing::info!(job_id = %job.id, customer_id = %job.customer_id, mode = ?job.booking_mode, "Job created");
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/jobs — all jobs with bid counts.
pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<JobWithBidCount>>> {
    Ok(Json(state.db.list_jobs().await?))
}

/// GET /api/jobs/{id}
pub async fn get_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Job>> {
    let job = state
        .db
        .get_job(&id)
        .await?
        .ok_or(ApiError::JobNotFound(id))?;
    Ok(Json(job))
}

/// POST /api/jobs/{id}/accept — the instant-book claim race.
///
/// First provider to pass validation and win the CAS gets the job; every
/// other caller observes 403. The deadline is re-asserted inside the CAS
/// predicate, so an expired window cannot be claimed even if this handler's
/// snapshot was read while the window was still open.
pub async fn accept(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<ProviderAction>,
) -> ApiResult<Json<Job>> {
    let job = state
        .db
        .get_job(&id)
        .await?
        .ok_or_else(|| ApiError::JobNotFound(id.clone()))?;

    let now = now_ms();
    let patch = claim_instant_book(&job, &req.provider_id, now)?;
    let won = state.db.apply_job_patch(&id, &patch, now, Some(now)).await?;
    if !won {
        return Err(TransitionError::LostRace.into());
    }

    tracing::info!(job_id = %id, provider_id = %req.provider_id, "Instant-book job claimed");
    reload(&state, &id).await
}

/// POST /api/jobs/{id}/complete — assigned provider marks the work done.
pub async fn complete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<ProviderAction>,
) -> ApiResult<Json<Job>> {
    let job = state
        .db
        .get_job(&id)
        .await?
        .ok_or_else(|| ApiError::JobNotFound(id.clone()))?;

    let patch = complete_job(&job, &req.provider_id)?;
    if !state.db.apply_job_patch(&id, &patch, now_ms(), None).await? {
        return Err(TransitionError::LostRace.into());
    }

    tracing::info!(job_id = %id, provider_id = %req.provider_id, "Job completed");
    reload(&state, &id).await
}

/// POST /api/jobs/{id}/cancel — customer or assigned provider terminates.
pub async fn cancel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CancelAction>,
) -> ApiResult<Json<Job>> {
    let job = state
        .db
        .get_job(&id)
        .await?
        .ok_or_else(|| ApiError::JobNotFound(id.clone()))?;

    let patch = cancel_job(&job, &req.caller_id)?;
    if !state.db.apply_job_patch(&id, &patch, now_ms(), None).await? {
        return Err(TransitionError::LostRace.into());
    }

    tracing::info!(job_id = %id, caller_id = %req.caller_id, "Job cancelled");
    reload(&state, &id).await
}

async fn reload(state: &AppState, id: &str) -> ApiResult<Json<Job>> {
    let job = state
        .db
        .get_job(id)
        .await?
        .ok_or_else(|| ApiError::JobNotFound(id.to_string()))?;
    Ok(Json(job))
}

/// Build the jobs router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/jobs", post(create).get(list))
        .route("/jobs/{id}", get(get_by_id))
        .route("/jobs/{id}/accept", post(accept))
        .route("/jobs/{id}/complete", post(complete))
        .route("/jobs/{id}/cancel", post(cancel))
}
