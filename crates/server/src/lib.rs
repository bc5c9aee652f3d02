// crates/server/src/lib.rs
//! Taskmarket server library.
//!
//! This crate provides the Axum-based HTTP server for the taskmarket job
//! marketplace. It serves a REST API for posting jobs, the instant-book
//! claim race, bidding with auto-undercut, ratings, and dashboard stats.

pub mod error;
pub mod routes;
pub mod state;

pub use error::*;
pub use routes::api_routes;
pub use state::AppState;

use axum::Router;
use taskmarket_db::Database;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the Axum application with all routes and middleware.
///
/// This sets up:
/// - API routes (health, jobs, bids, ratings, users, categories, stats)
/// - CORS for development (allows any origin)
/// - Request tracing
pub fn create_app(db: Database) -> Router {
    let state = AppState::new(db);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api_routes())
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// ============================================================================
// Integration Tests
// ============================================================================
