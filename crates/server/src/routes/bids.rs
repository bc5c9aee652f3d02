// crates/server/src/routes/bids.rs
//! Bid submission, award, listing, and ranking endpoints.
//!
//! Submission runs the auto-undercut pipeline: if the job is still open with
//! a published accept price and the incoming quote meets it, the bid wins
//! the job on the spot via the same CAS every other transition uses. The
//! bid row is persisted either way, so the history of quotes survives the
//! assignment.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use taskmarket_core::{
    award_bid, rank_top_bids, undercut_applies, undercut_patch, Bid, Job, RankedBid,
    TransitionError,
};
use taskmarket_db::BidWithProvider;

use crate::error::{ApiError, ApiResult};
use crate::state::{now_ms, AppState};

/// Body for POST /api/bids.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBidRequest {
    pub job_id: String,
    pub provider_id: String,
    pub price: f64,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub eta: Option<i64>,
}

/// Body for POST /api/bids/{id}/accept.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardBidRequest {
    pub customer_id: String,
}

/// POST /api/bids — provider quotes a price for a job.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitBidRequest>,
) -> ApiResult<(StatusCode, Json<Bid>)> {
    if !req.price.is_finite() || req.price < 0.0 {
        return Err(ApiError::BadRequest("price must be a non-negative number".into()));
    }

    let job = state
        .db
        .get_job(&req.job_id)
        .await?
        .ok_or_else(|| ApiError::JobNotFound(req.job_id.clone()))?;

    let now = now_ms();

    // Undercut check first: an assignment that loses the CAS just means
    // someone else got there, and the bid still goes on record below.
    if undercut_applies(&job, req.price) {
        let patch = undercut_patch(&req.provider_id);
        let won = state
            .db
            .apply_job_patch(&job.id, &patch, now, None)
            .await?;
        if won {
            tracing::info!(
                job_id = %job.id,
                provider_id = %req.provider_id,
                price = req.price,
                "Bid met accept price, job auto-assigned"
            );
        }
    }

    let bid = Bid {
        id: Uuid::new_v4().to_string(),
        job_id: req.job_id,
        provider_id: req.provider_id,
        price: req.price,
        note: req.note,
        eta: req.eta,
        created_at: now,
    };
    state.db.insert_bid(&bid).await?;

    Ok((StatusCode::CREATED, Json(bid)))
}

/// POST /api/bids/{id}/accept — job owner awards the bid.
pub async fn accept(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<AwardBidRequest>,
) -> ApiResult<Json<Job>> {
    let bid = state
        .db
        .get_bid(&id)
        .await?
        .ok_or(ApiError::BidNotFound(id))?;
    let job = state
        .db
        .get_job(&bid.job_id)
        .await?
        .ok_or_else(|| ApiError::JobNotFound(bid.job_id.clone()))?;

    let patch = award_bid(&job, &bid, &req.customer_id)?;
    if !state.db.apply_job_patch(&job.id, &patch, now_ms(), None).await? {
        return Err(TransitionError::LostRace.into());
    }

    tracing::info!(job_id = %job.id, bid_id = %bid.id, provider_id = %bid.provider_id, "Bid awarded");
    let job = state
        .db
        .get_job(&bid.job_id)
        .await?
        .ok_or(ApiError::JobNotFound(bid.job_id))?;
    Ok(Json(job))
}

/// GET /api/jobs/{id}/bids — all bids in submission order.
pub async fn list_for_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<BidWithProvider>>> {
    if state.db.get_job(&id).await?.is_none() {
        return Err(ApiError::JobNotFound(id));
    }
    Ok(Json(state.db.list_bids_for_job(&id).await?))
}

/// GET /api/jobs/{id}/top-bids — up to three best bids by rank score.
pub async fn top_for_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<RankedBid>>> {
    if state.db.get_job(&id).await?.is_none() {
        return Err(ApiError::JobNotFound(id));
    }

    let with_providers = state.db.list_bids_for_job(&id).await?;
    let ratings: HashMap<String, f64> = with_providers
        .iter()
        .filter_map(|b| b.provider_rating.map(|r| (b.bid.provider_id.clone(), r)))
        .collect();
    let bids: Vec<Bid> = with_providers.into_iter().map(|b| b.bid).collect();

    let ranked = rank_top_bids(&bids, |provider_id| ratings.get(provider_id).copied());
    Ok(Json(ranked))
}

/// Build the bids router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bids", post(submit))
        .route("/bids/{id}/accept", post(accept))
        .route("/jobs/{id}/bids", get(list_for_job))
        .route("/jobs/{id}/top-bids", get(top_for_job))
}
