//! Recovery debt: a past deficit being paid back over a number of weeks.
//!
//! At most one recovery debt is active at a time. It is created on the first
//! uncovered deficit and extended, never duplicated, on later ones.

pub mod ledger;
pub mod types;

pub use ledger::RecoveryLedger;
pub use types::{AmortizationWeeks, RecoveryDebt, RecoveryState};
