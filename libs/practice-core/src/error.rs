//! Error types for practice-core.

use thiserror::Error;

/// Result type alias using TrackerError.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Errors from the persisted state store.
///
/// Read-side problems (missing or corrupt file) are deliberately *not* errors:
/// the store substitutes an empty state instead. Only write failures surface,
/// since silently dropping a recorded answer corrupts the mastery model.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state file i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("state serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors surfaced by the tracker facade.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("cannot select from an empty candidate list")]
    EmptyCandidates,
}
