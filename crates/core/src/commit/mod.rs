//! Applying a finalized allocation plan to the collaborator stores.
//!
//! Steps run sequentially in a fixed order and are not rolled back: if a
//! step fails, earlier steps have taken effect and later ones are skipped.
//! The returned `CommitResult` says exactly which.

pub mod result;
pub mod service;

#[cfg(test)]
mod tests;

pub use result::{CommitFailure, CommitResult, CommitStage, CommitStep, PlannedStep, planned_steps};
pub use service::ReconciliationCommitter;
