//! Reconciliation error types.

use thiserror::Error;
use weekclose_shared::StoreError;

use crate::commit::CommitStage;

/// Result type alias using `ReconcileError`.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Errors raised while classifying, planning, or committing a week.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// A snapshot field is negative or otherwise unusable.
    #[error("Invalid snapshot: {field} {reason}")]
    InvalidSnapshot {
        /// Offending field.
        field: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Amortization window outside 1..=24 weeks.
    #[error("Amortization weeks must be between 1 and 24, got {0}")]
    AmortizationOutOfRange(u32),

    /// The caller's overrides cannot be applied to this snapshot.
    #[error("Invalid override: {0}")]
    InvalidOverride(String),

    /// A collaborator could not be read while assembling the snapshot.
    #[error("Failed to read {what}: {source}")]
    StoreReadFailed {
        /// What was being read.
        what: &'static str,
        /// Underlying store error.
        source: StoreError,
    },

    /// A collaborator write failed part-way through a commit.
    #[error("{stage} failed: {source}")]
    StoreWriteFailed {
        /// Commit step that failed.
        stage: CommitStage,
        /// Underlying store error.
        source: StoreError,
    },
}

impl ReconcileError {
    /// Builds an `InvalidSnapshot` error.
    #[must_use]
    pub fn invalid_snapshot(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSnapshot {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Builds an `InvalidOverride` error.
    #[must_use]
    pub fn invalid_override(reason: impl Into<String>) -> Self {
        Self::InvalidOverride(reason.into())
    }
}
