//! Errors reported by external collaborator stores.

use serde::Serialize;
use thiserror::Error;

/// Result type alias using `StoreError`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of a goal, savings, ledger, or report store call.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum StoreError {
    /// The store could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The call did not complete in time.
    #[error("Store call timed out: {0}")]
    Timeout(String),

    /// The store refused the write.
    #[error("Store rejected the write: {0}")]
    Rejected(String),

    /// The referenced record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl StoreError {
    /// Returns a stable code for host applications.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "STORE_UNAVAILABLE",
            Self::Timeout(_) => "STORE_TIMEOUT",
            Self::Rejected(_) => "STORE_REJECTED",
            Self::NotFound(_) => "NOT_FOUND",
        }
    }

    /// Returns true if retrying the same call may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }
}
