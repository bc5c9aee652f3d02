// crates/server/src/state.rs
//! Application state for the Axum server.

use std::sync::Arc;
use std::time::Instant;

use taskmarket_db::Database;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    /// Database handle for job/bid/rating queries.
    pub db: Database,
}

impl AppState {
    /// Create a new application state wrapped in an Arc for sharing.
    pub fn new(db: Database) -> Arc<Self> {
        Arc::new(Self {
            start_time: Instant::now(),
            db,
        })
    }

    /// Get the server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Request-time wall clock in milliseconds since the Unix epoch.
///
/// All deadline comparisons (the instant-book accept window) and stored
/// timestamps flow from this single function.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
