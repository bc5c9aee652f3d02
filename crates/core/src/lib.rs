// crates/core/src/lib.rs
//! Taskmarket domain core.
//!
//! Pure decision logic for the job marketplace: entity types, the job
//! lifecycle state machine, the auto-undercut assignment rule, and the
//! bid-ranking algorithm. No I/O lives here — persistence and HTTP are
//! handled by `taskmarket-db` and `taskmarket-server`.

pub mod error;
pub mod lifecycle;
pub mod ranking;
pub mod types;
pub mod undercut;

pub use error::*;
pub use lifecycle::*;
pub use ranking::*;
pub use types::*;
pub use undercut::*;
