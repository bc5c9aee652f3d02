// crates/core/src/error.rs
use thiserror::Error;

use crate::types::JobStatus;

/// A rejected job state transition.
///
/// Every variant is a caller-scoped authority or timing failure; the API
/// layer maps them all to `403 Forbidden`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("job is {status}, not OPEN")]
    NotOpen { status: JobStatus },

    #[error("job is not an instant-book job")]
    NotInstantBook,

    #[error("accept window has closed")]
    WindowClosed,

    #[error("caller is not the job's customer")]
    NotJobOwner,

    #[error("caller is not the assigned provider")]
    NotAssignedProvider,

    #[error("job is {status} and cannot be completed")]
    NotCompletable { status: JobStatus },

    #[error("job is {status} and cannot be cancelled")]
    NotCancellable { status: JobStatus },

    #[error("caller is neither the job's customer nor its provider")]
    NotParticipant,

    /// The storage-layer conditional update matched zero rows: another
    /// caller transitioned the job first.
    #[error("job was concurrently modified")]
    LostRace,
}
