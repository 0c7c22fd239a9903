//! Collaborator store traits.
//!
//! These traits are implemented outside this crate (see `weekclose-store`)
//! to provide the actual persistence. Each store is responsible for its
//! own mutual exclusion and timeouts.

use std::future::Future;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use weekclose_shared::{GoalId, LedgerEntryId, Money, StoreResult};

use crate::recovery::RecoveryDebt;
use crate::report::WeekReport;
use crate::snapshot::SavingsGoalRef;

/// Savings and recovery goal persistence.
pub trait GoalStore: Send + Sync {
    /// Active savings goals.
    fn list_active_savings_goals(
        &self,
    ) -> impl Future<Output = StoreResult<Vec<SavingsGoalRef>>> + Send;

    /// The recovery debt record, settled or not, if one was ever created.
    fn list_active_recovery_debt(
        &self,
    ) -> impl Future<Output = StoreResult<Option<RecoveryDebt>>> + Send;

    /// Adds to a goal's saved amount. Returns the amount actually applied.
    fn add_contribution(
        &self,
        goal_id: GoalId,
        amount: Money,
    ) -> impl Future<Output = StoreResult<Money>> + Send;

    /// Inserts or replaces the single recovery debt record.
    fn upsert_recovery_debt(
        &self,
        debt: RecoveryDebt,
    ) -> impl Future<Output = StoreResult<()>> + Send;
}

/// The savings cushion balance.
pub trait SavingsBalanceStore: Send + Sync {
    /// Current balance.
    fn get_balance(&self) -> impl Future<Output = StoreResult<Money>> + Send;

    /// Deposits `amount`. Returns the new balance.
    fn add(&self, amount: Money) -> impl Future<Output = StoreResult<Money>> + Send;

    /// Withdraws up to `amount`. Returns the amount actually withdrawn.
    fn withdraw(&self, amount: Money) -> impl Future<Output = StoreResult<Money>> + Send;
}

/// Category tag of a synthetic ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerCategory {
    /// Money moved into a savings goal.
    GoalContribution,
    /// Money paid towards the recovery debt.
    RecoveryPayment,
}

impl LedgerCategory {
    /// Tag stored with the entry.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GoalContribution => "goal contribution",
            Self::RecoveryPayment => "recovery payment",
        }
    }
}

impl std::fmt::Display for LedgerCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A synthetic expense entry written by the committer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Entry ID.
    pub id: LedgerEntryId,
    /// Amount moved.
    pub amount: Money,
    /// Human-readable description.
    pub description: String,
    /// Last day of the closed week.
    pub date: NaiveDate,
    /// Category tag.
    pub category: LedgerCategory,
}

impl LedgerEntry {
    /// Creates an entry with a fresh ID.
    #[must_use]
    pub fn new(
        amount: Money,
        description: impl Into<String>,
        date: NaiveDate,
        category: LedgerCategory,
    ) -> Self {
        Self {
            id: LedgerEntryId::new(),
            amount,
            description: description.into(),
            date,
            category,
        }
    }
}

/// The transaction ledger.
pub trait TransactionLedger: Send + Sync {
    /// Appends an entry.
    fn insert(&self, entry: LedgerEntry) -> impl Future<Output = StoreResult<()>> + Send;
}

/// Persisted weekly reports.
pub trait ReportStore: Send + Sync {
    /// Inserts or replaces the report for `report.week_end`.
    fn upsert(&self, report: WeekReport) -> impl Future<Output = StoreResult<()>> + Send;

    /// Most recent reports, newest first.
    fn recent(&self, limit: usize) -> impl Future<Output = StoreResult<Vec<WeekReport>>> + Send;
}
