use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a checkin was refused for a booking that exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckinRejection {
    /// The booking is still `pending`.
    NotConfirmed,
    /// The booking was cancelled.
    Cancelled,
}

impl fmt::Display for CheckinRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckinRejection::NotConfirmed => f.write_str("booking is not confirmed"),
            CheckinRejection::Cancelled => f.write_str("booking is cancelled"),
        }
    }
}

#[derive(Error, Debug)]
pub enum BookError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Not confirmed: {0}")]
    NotConfirmed(String),

    #[error("Checkin rejected: {0}")]
    CheckinRejected(CheckinRejection),

    #[error("Ownership mismatch: {0}")]
    OwnershipMismatch(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Dependency failure: {0}")]
    Dependency(#[from] eyre::Report),
}

impl BookError {
    /// Expected business outcomes that callers branch on, as opposed to
    /// failures of the system itself.
    pub fn is_expected(&self) -> bool {
        !matches!(self, BookError::Dependency(_))
    }
}

pub type BookResult<T> = Result<T, BookError>;
