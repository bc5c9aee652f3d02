// crates/core/src/undercut.rs
//! The auto-undercut assignment rule.
//!
//! A bid that matches or beats a job's published accept price wins the job
//! automatically, without the customer separately accepting it. The rule is
//! evaluated as an explicit step of the bid-submission pipeline: evaluate
//! here, conditionally transition the job through the storage CAS, then
//! persist the bid regardless of the outcome.

use crate::lifecycle::JobPatch;
use crate::types::{Job, JobStatus};

/// Whether a submitted price triggers automatic assignment of `job`.
///
/// Fires when the job has a published `accept_price`, the price matches or
/// beats it, and the job is still `Open`. Booking mode is irrelevant. A job
/// that has already left `Open` is never reassigned, keeping the state
/// machine closed over its terminal and claimed states.
pub fn undercut_applies(job: &Job, price: f64) -> bool {
    job.status == JobStatus::Open
        && matches!(job.accept_price, Some(accept) if price <= accept)
}

/// The transition an undercutting bid applies: `Open → Assigned` with the
/// submitting provider. The published accept price is left as-is.
pub fn undercut_patch(provider_id: &str) -> JobPatch {
    JobPatch {
        from: JobStatus::Open,
        to: JobStatus::Assigned,
        provider_id: Some(provider_id.to_string()),
        accept_price: None,
    }
}
