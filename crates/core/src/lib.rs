//! Core reconciliation logic for Weekclose.
//!
//! This crate contains the week-closing logic with ZERO storage dependencies.
//! Classification and planning are pure; committing goes through the
//! collaborator traits in `ports`.
//!
//! # Modules
//!
//! - `snapshot` - Inputs of a week being closed
//! - `classify` - Scenario classification and deficit/surplus figures
//! - `planner` - Allocation of a surplus or coverage of a deficit
//! - `recovery` - The single amortized recovery debt
//! - `commit` - Applying a plan to the stores, step by step
//! - `report` - Weekly reports and on-track streaks
//! - `closer` - End-to-end week closing over the stores

pub mod calendar;
pub mod classify;
pub mod closer;
pub mod commit;
pub mod error;
pub mod planner;
pub mod ports;
pub mod recovery;
pub mod report;
pub mod snapshot;

#[cfg(test)]
mod testing;

pub use classify::{ClassificationResult, Scenario, ScenarioClassifier};
pub use closer::{ClosedWeek, WeekCloser, WeekPreview};
pub use commit::{CommitResult, CommitStage, ReconciliationCommitter};
pub use error::{ReconcileError, ReconcileResult};
pub use planner::{AllocationPlan, AllocationPlanner, GoalSelection, UserOverrides};
pub use recovery::{AmortizationWeeks, RecoveryDebt, RecoveryLedger, RecoveryState};
pub use snapshot::{SavingsGoalRef, WeekFigures, WeekSnapshot};
