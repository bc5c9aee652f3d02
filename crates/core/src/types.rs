// crates/core/src/types.rs
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// How long an instant-book job stays claimable after creation (ms).
pub const ACCEPT_WINDOW_MS: i64 = 30_000;

/// How a job gets matched with a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingMode {
    /// Fixed price, first provider to claim within the accept window wins.
    InstantBook,
    /// Providers submit priced quotes; the customer picks a winner.
    BidAndQuote,
}

/// Job lifecycle states.
///
/// `Open → {Booked, Assigned, Cancelled}`; `Booked`/`Assigned` → `{Completed,
/// Cancelled}`; `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Open,
    Booked,
    Assigned,
    Completed,
    Cancelled,
}

impl JobStatus {
    /// Whether any transition out of this state remains possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Cancelled)
    }

    /// The state machine's transition table.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        use JobStatus::*;
        matches!(
            (self, next),
            (Open, Booked)
                | (Open, Assigned)
                | (Open, Cancelled)
                | (Booked, Completed)
                | (Booked, Cancelled)
                | (Assigned, Completed)
                | (Assigned, Cancelled)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Open => write!(f, "OPEN"),
            JobStatus::Booked => write!(f, "BOOKED"),
            JobStatus::Assigned => write!(f, "ASSIGNED"),
            JobStatus::Completed => write!(f, "COMPLETED"),
            JobStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// User role. There is no auth layer; callers identify themselves by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Customer,
    Provider,
}

/// A posted job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category_id: String,
    pub booking_mode: BookingMode,
    pub status: JobStatus,
    /// Fixed price for instant-book; indicative/ceiling price for bid-and-quote.
    pub price: f64,
    /// Final agreed price, set on assignment (always set for instant-book).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub accept_price: Option<f64>,
    #[ts(type = "number")]
    pub scheduled_at: i64,
    /// Claim deadline for the instant-book race; unset for bid-and-quote.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub accept_until: Option<i64>,
    pub customer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    #[ts(type = "number")]
    pub created_at: i64,
    #[ts(type = "number")]
    pub updated_at: i64,
}

/// A provider's quote on a job. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: String,
    pub job_id: String,
    pub provider_id: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Estimated hours to completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub eta: Option<i64>,
    #[ts(type = "number")]
    pub created_at: i64,
}

/// One rating per (job, provider) pair, recorded after completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: String,
    pub job_id: String,
    pub provider_id: String,
    #[ts(type = "number")]
    pub score: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[ts(type = "number")]
    pub created_at: i64,
}

/// A marketplace user (customer or provider).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Denormalized average rating; `None` until the provider is first rated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[ts(type = "number")]
    pub created_at: i64,
}

/// A job category (plumbing, electrical, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(!JobStatus::Open.is_terminal());
        assert!(!JobStatus::Booked.is_terminal());
        assert!(!JobStatus::Assigned.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
    }

    #[test]
    fn transition_table() {
        use JobStatus::*;
        assert!(Open.can_transition_to(Booked));
        assert!(Open.can_transition_to(Assigned));
        assert!(Open.can_transition_to(Cancelled));
        assert!(Booked.can_transition_to(Completed));
        assert!(Assigned.can_transition_to(Completed));
        assert!(Assigned.can_transition_to(Cancelled));

        // No transition leaves a terminal state.
        for from in [Completed, Cancelled] {
            for to in [Open, Booked, Assigned, Completed, Cancelled] {
                assert!(!from.can_transition_to(to), "{from} -> {to} should be closed");
            }
        }

        // Booked never becomes Assigned (and vice versa), and nothing reopens.
        assert!(!Booked.can_transition_to(Assigned));
        assert!(!Assigned.can_transition_to(Booked));
        assert!(!Booked.can_transition_to(Open));
        assert!(!Open.can_transition_to(Open));
    }

    #[test]
    fn status_wire_format() {
        assert_eq!(serde_json::to_string(&JobStatus::Open).unwrap(), "\"OPEN\"");
        assert_eq!(
            serde_json::to_string(&BookingMode::InstantBook).unwrap(),
            "\"INSTANT_BOOK\""
        );
        assert_eq!(
            serde_json::to_string(&BookingMode::BidAndQuote).unwrap(),
            "\"BID_AND_QUOTE\""
        );
    }

    #[test]
    fn job_serializes_camel_case() {
        let job = Job {
            id: "j1".into(),
            title: "Fix sink".into(),
            description: None,
            category_id: "c1".into(),
            booking_mode: BookingMode::InstantBook,
            status: JobStatus::Open,
            price: 120.0,
            accept_price: Some(120.0),
            scheduled_at: 1_700_000_000_000,
            accept_until: Some(1_700_000_030_000),
            customer_id: "u1".into(),
            provider_id: None,
            created_at: 1_700_000_000_000,
            updated_at: 1_700_000_000_000,
        };
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["bookingMode"], "INSTANT_BOOK");
        assert_eq!(json["acceptUntil"], 1_700_000_030_000_i64);
        assert!(json.get("providerId").is_none());
    }
}
