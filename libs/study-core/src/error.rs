//! Error types for study-core.

use thiserror::Error;

use crate::types::StudyMode;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by the review engine. All of them are raised before any
/// state is mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid quality {0}: expected one of 0, 1, 3, 5")]
    InvalidQuality(i64),

    #[error("limit must be greater than zero")]
    InvalidLimit,

    #[error("option {index} is out of range for {count} options")]
    OptionOutOfRange { index: usize, count: usize },

    #[error("response does not apply to {mode} mode")]
    ResponseMismatch { mode: StudyMode },

    #[error("match slot {index} is out of range for {count} items")]
    MatchSlotOutOfRange { index: usize, count: usize },

    #[error("match slot {index} is already matched")]
    AlreadyMatched { index: usize },

    #[error("session has already been started")]
    SessionAlreadyStarted,

    #[error("session has not been started")]
    SessionNotStarted,

    #[error("session is already finished")]
    SessionFinished,
}
