// crates/core/src/ranking.rs
//! The bid-ranking algorithm.
//!
//! Competing bids on a job are ordered by a composite score:
//!
//! ```text
//! score = price × (1 / max(rating, ε)) × max(eta, 1)
//! ```
//!
//! Lower is better — cheaper, higher-rated, faster bids rank first. A
//! provider with no rating (or a non-positive one) is treated as rated 1,
//! and an unset or zero eta contributes no multiplicative distortion. Ties
//! keep submission order: the sort is stable over the storage-ordered bid
//! list.

use serde::Serialize;
use ts_rs::TS;

use crate::types::Bid;

/// How many ranked bids a shortlist returns.
pub const TOP_BIDS_LIMIT: usize = 3;

/// Floor for the rating divisor, guarding the division against zero.
pub const RATING_EPSILON: f64 = 1e-6;

/// A bid annotated with its resolved provider rating and rank score.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "camelCase")]
pub struct RankedBid {
    #[serde(flatten)]
    pub bid: Bid,
    pub rating: f64,
    pub rank_score: f64,
}

/// Resolve a provider's reputation rating for scoring.
///
/// No rating on record, or a rating ≤ 0, defaults to 1.
pub fn resolve_rating(rating: Option<f64>) -> f64 {
    match rating {
        Some(r) if r > 0.0 => r,
        _ => 1.0,
    }
}

/// Compute a bid's rank score from its price, resolved rating, and eta.
pub fn rank_score(price: f64, rating: f64, eta: Option<i64>) -> f64 {
    let eta_factor = match eta {
        Some(h) if h > 1 => h as f64,
        _ => 1.0,
    };
    price * (1.0 / rating.max(RATING_EPSILON)) * eta_factor
}

/// Rank a job's bids and return the top [`TOP_BIDS_LIMIT`] lowest-scoring.
///
/// `provider_rating` is the reputation lookup; `bids` must be in submission
/// (storage) order so that equal scores tie-break oldest-first.
pub fn rank_top_bids<F>(bids: &[Bid], mut provider_rating: F) -> Vec<RankedBid>
where
    F: FnMut(&str) -> Option<f64>,
{
    let mut ranked: Vec<RankedBid> = bids
        .iter()
        .map(|bid| {
            let rating = resolve_rating(provider_rating(&bid.provider_id));
            RankedBid {
                rank_score: rank_score(bid.price, rating, bid.eta),
                rating,
                bid: bid.clone(),
            }
        })
        .collect();

    // Stable sort: equal scores retain submission order.
    ranked.sort_by(|a, b| {
        a.rank_score
            .partial_cmp(&b.rank_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(TOP_BIDS_LIMIT);
    ranked
}
