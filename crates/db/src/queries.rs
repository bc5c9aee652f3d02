// crates/db/src/queries.rs
// Entity CRUD and the atomic job-transition updates.

pub mod bids;
pub mod categories;
pub mod jobs;
pub mod ratings;
pub mod stats;
pub mod users;

use taskmarket_core::{BookingMode, JobStatus, Role};

/// TEXT encoding of a job status, shared by reads and the CAS predicates.
pub(crate) fn job_status_str(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Open => "OPEN",
        JobStatus::Booked => "BOOKED",
        JobStatus::Assigned => "ASSIGNED",
        JobStatus::Completed => "COMPLETED",
        JobStatus::Cancelled => "CANCELLED",
    }
}

pub(crate) fn parse_job_status(s: &str) -> Result<JobStatus, sqlx::Error> {
    match s {
        "OPEN" => Ok(JobStatus::Open),
        "BOOKED" => Ok(JobStatus::Booked),
        "ASSIGNED" => Ok(JobStatus::Assigned),
        "COMPLETED" => Ok(JobStatus::Completed),
        "CANCELLED" => Ok(JobStatus::Cancelled),
        other => Err(sqlx::Error::Decode(
            format!("unknown job status: {other}").into(),
        )),
    }
}

pub(crate) fn booking_mode_str(mode: BookingMode) -> &'static str {
    match mode {
        BookingMode::InstantBook => "INSTANT_BOOK",
        BookingMode::BidAndQuote => "BID_AND_QUOTE",
    }
}

pub(crate) fn parse_booking_mode(s: &str) -> Result<BookingMode, sqlx::Error> {
    match s {
        "INSTANT_BOOK" => Ok(BookingMode::InstantBook),
        "BID_AND_QUOTE" => Ok(BookingMode::BidAndQuote),
        other => Err(sqlx::Error::Decode(
            format!("unknown booking mode: {other}").into(),
        )),
    }
}

pub(crate) fn role_str(role: Role) -> &'static str {
    match role {
        Role::Customer => "CUSTOMER",
        Role::Provider => "PROVIDER",
    }
}

pub(crate) fn parse_role(s: &str) -> Result<Role, sqlx::Error> {
    match s {
        "CUSTOMER" => Ok(Role::Customer),
        "PROVIDER" => Ok(Role::Provider),
        other => Err(sqlx::Error::Decode(format!("unknown role: {other}").into())),
    }
}
