//! In-memory collaborator stores for Weekclose.
//!
//! This crate provides:
//! - `MemoryGoalStore` - savings goals and the single recovery debt
//! - `MemorySavingsStore` - the savings cushion balance
//! - `MemoryLedger` - synthetic transaction entries
//! - `MemoryReportStore` - closed week reports
//!
//! Each store serializes its own writers, so a `WeekCloser` can share them
//! with other tasks.

pub mod goals;
pub mod ledger;
pub mod reports;
pub mod savings;

use std::sync::Arc;

pub use goals::MemoryGoalStore;
pub use ledger::MemoryLedger;
pub use reports::MemoryReportStore;
pub use savings::MemorySavingsStore;

use weekclose_core::report::WeekReport;
use weekclose_core::{ReconcileResult, RecoveryDebt, SavingsGoalRef, WeekCloser};
use weekclose_shared::{Money, ReconcileConfig};

/// A `WeekCloser` over the in-memory stores.
pub type MemoryWeekCloser =
    WeekCloser<MemoryGoalStore, MemorySavingsStore, MemoryLedger, MemoryReportStore>;

/// The four in-memory stores, shared.
#[derive(Debug, Clone, Default)]
pub struct MemoryStores {
    /// Goal store.
    pub goals: Arc<MemoryGoalStore>,
    /// Savings cushion.
    pub savings: Arc<MemorySavingsStore>,
    /// Transaction ledger.
    pub ledger: Arc<MemoryLedger>,
    /// Report store.
    pub reports: Arc<MemoryReportStore>,
}

impl MemoryStores {
    /// Creates stores seeded with existing state.
    #[must_use]
    pub fn seeded(
        goals: Vec<SavingsGoalRef>,
        recovery: Option<RecoveryDebt>,
        app_savings_balance: Money,
        history: Vec<WeekReport>,
    ) -> Self {
        Self {
            goals: Arc::new(MemoryGoalStore::new(goals, recovery)),
            savings: Arc::new(MemorySavingsStore::new(app_savings_balance)),
            ledger: Arc::new(MemoryLedger::default()),
            reports: Arc::new(MemoryReportStore::new(history)),
        }
    }

    /// A week closer over these stores.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured amortization window is invalid.
    pub fn closer(&self, config: &ReconcileConfig) -> ReconcileResult<MemoryWeekCloser> {
        WeekCloser::new(
            Arc::clone(&self.goals),
            Arc::clone(&self.savings),
            Arc::clone(&self.ledger),
            Arc::clone(&self.reports),
            config,
        )
    }
}
