// crates/core/src/lifecycle.rs
//! The job lifecycle state machine.
//!
//! Every state transition in the system is validated here, as a pure
//! function over a job snapshot, the caller's identity, and the request-time
//! wall clock. A successful check yields a [`JobPatch`] whose `from` field
//! doubles as the compare-and-swap predicate the storage layer re-asserts
//! when applying the write, so concurrent callers racing for the same
//! transition get at-most-one winner.

use uuid::Uuid;

use crate::error::TransitionError;
use crate::types::{Bid, BookingMode, Job, JobStatus, ACCEPT_WINDOW_MS};

/// Customer-supplied fields for a new job.
#[derive(Debug, Clone)]
pub struct JobDraft {
    pub title: String,
    pub description: Option<String>,
    pub category_id: String,
    pub booking_mode: BookingMode,
    pub price: f64,
    pub accept_price: Option<f64>,
}

/// A validated transition, ready to be applied atomically.
///
/// `provider_id` and `accept_price` are written only when `Some`; `from` is
/// the status the job must still hold at write time.
#[derive(Debug, Clone, PartialEq)]
pub struct JobPatch {
    pub from: JobStatus,
    pub to: JobStatus,
    pub provider_id: Option<String>,
    pub accept_price: Option<f64>,
}

/// Create a new `Open` job for a customer.
///
/// Instant-book jobs get `accept_until = now + 30s` (the accept race
/// window) and their fixed price doubles as the accept price. Bid-and-quote
/// jobs leave `accept_until` unset; `accept_price`, when given, is the
/// published ceiling that arms the auto-undercut rule.
pub fn create_job(customer_id: &str, draft: JobDraft, now_ms: i64) -> Job {
    let (accept_until, accept_price) = match draft.booking_mode {
        BookingMode::InstantBook => (
            Some(now_ms + ACCEPT_WINDOW_MS),
            draft.accept_price.or(Some(draft.price)),
        ),
        BookingMode::BidAndQuote => (None, draft.accept_price),
    };

    Job {
        id: Uuid::new_v4().to_string(),
        title: draft.title,
        description: draft.description,
        category_id: draft.category_id,
        booking_mode: draft.booking_mode,
        status: JobStatus::Open,
        price: draft.price,
        accept_price,
        scheduled_at: now_ms,
        accept_until,
        customer_id: customer_id.to_string(),
        provider_id: None,
        created_at: now_ms,
        updated_at: now_ms,
    }
}

/// Validate an instant-book claim by `provider_id` at `now_ms`.
///
/// Requires an `Open` instant-book job whose accept window is still open
/// (`now ≤ accept_until`). The winner of the race moves the job to `Booked`;
/// everyone else fails here or at the storage CAS.
pub fn claim_instant_book(
    job: &Job,
    provider_id: &str,
    now_ms: i64,
) -> Result<JobPatch, TransitionError> {
    if job.booking_mode != BookingMode::InstantBook {
        return Err(TransitionError::NotInstantBook);
    }
    if job.status != JobStatus::Open {
        return Err(TransitionError::NotOpen { status: job.status });
    }
    match job.accept_until {
        Some(deadline) if now_ms <= deadline => {}
        _ => return Err(TransitionError::WindowClosed),
    }

    Ok(patch(
        JobStatus::Open,
        JobStatus::Booked,
        Some(provider_id.to_string()),
        None,
    ))
}

/// Validate a customer awarding a job to one of its bids.
///
/// The caller must own the bid's job, and the job must still be `Open` — a
/// bid is never accepted once the job has been claimed, awarded, or closed.
pub fn award_bid(job: &Job, bid: &Bid, customer_id: &str) -> Result<JobPatch, TransitionError> {
    if job.customer_id != customer_id {
        return Err(TransitionError::NotJobOwner);
    }
    if job.status != JobStatus::Open {
        return Err(TransitionError::NotOpen { status: job.status });
    }

    Ok(patch(
        JobStatus::Open,
        JobStatus::Assigned,
        Some(bid.provider_id.clone()),
        Some(bid.price),
    ))
}

/// Validate the assigned provider marking the job done.
///
/// The status check comes first: a job that was never assigned has no
/// provider to compare against, and rejecting on state keeps the guard
/// explicit rather than leaning on a null-never-equals comparison.
pub fn complete_job(job: &Job, provider_id: &str) -> Result<JobPatch, TransitionError> {
    if !matches!(job.status, JobStatus::Booked | JobStatus::Assigned) {
        return Err(TransitionError::NotCompletable { status: job.status });
    }
    if job.provider_id.as_deref() != Some(provider_id) {
        return Err(TransitionError::NotAssignedProvider);
    }

    Ok(patch(job.status, JobStatus::Completed, None, None))
}

/// Validate a cancellation by the customer or the assigned provider.
///
/// Allowed from `Open`, `Booked`, or `Assigned`; terminal jobs stay put.
pub fn cancel_job(job: &Job, caller_id: &str) -> Result<JobPatch, TransitionError> {
    let is_customer = job.customer_id == caller_id;
    let is_provider = job.provider_id.as_deref() == Some(caller_id);
    if !is_customer && !is_provider {
        return Err(TransitionError::NotParticipant);
    }
    if job.status.is_terminal() {
        return Err(TransitionError::NotCancellable { status: job.status });
    }

    Ok(patch(job.status, JobStatus::Cancelled, None, None))
}

fn patch(
    from: JobStatus,
    to: JobStatus,
    provider_id: Option<String>,
    accept_price: Option<f64>,
) -> JobPatch {
    debug_assert!(from.can_transition_to(to), "{from} -> {to} not in the table");
    JobPatch {
        from,
        to,
        provider_id,
        accept_price,
    }
}
