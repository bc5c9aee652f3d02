// crates/server/src/routes/mod.rs
//! HTTP route handlers, one module per resource.

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

pub mod bids;
pub mod categories;
pub mod health;
pub mod jobs;
pub mod ratings;
pub mod stats;
pub mod users;

/// All API routes, mounted under `/api` by [`crate::create_app`].
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health::router())
        .merge(jobs::router())
        .merge(bids::router())
        .merge(ratings::router())
        .merge(users::router())
        .merge(categories::router())
        .merge(stats::router())
}
