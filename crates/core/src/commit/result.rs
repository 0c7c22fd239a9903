//! Commit steps and outcomes.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;
use weekclose_shared::{GoalId, Money, StoreError};

use crate::error::ReconcileError;
use crate::planner::AllocationPlan;
use crate::recovery::RecoveryDebt;

/// The store call a commit step makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitStage {
    /// `GoalStore::add_contribution` for a savings goal.
    GoalContribution,
    /// Ledger entry for a savings goal contribution.
    GoalLedgerEntry,
    /// `SavingsBalanceStore::withdraw`.
    SavingsWithdrawal,
    /// Reading and upserting the recovery debt.
    RecoveryDebt,
    /// `GoalStore::add_contribution` for the recovery debt.
    RecoveryPayment,
    /// Ledger entry for a recovery payment.
    RecoveryLedgerEntry,
    /// `SavingsBalanceStore::add`.
    SavingsDeposit,
    /// `ReportStore::upsert`.
    Report,
}

impl std::fmt::Display for CommitStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::GoalContribution => "savings goal contribution",
            Self::GoalLedgerEntry => "goal contribution ledger entry",
            Self::SavingsWithdrawal => "savings withdrawal",
            Self::RecoveryDebt => "recovery goal update",
            Self::RecoveryPayment => "recovery payment",
            Self::RecoveryLedgerEntry => "recovery payment ledger entry",
            Self::SavingsDeposit => "savings deposit",
            Self::Report => "weekly report",
        })
    }
}

/// A step that took effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum CommitStep {
    /// Contribution applied to a savings goal and recorded in the ledger.
    GoalContribution {
        /// Savings goal.
        goal_id: GoalId,
        /// Planned amount.
        requested: Money,
        /// Amount the store applied.
        applied: Money,
    },
    /// Money taken from the savings cushion.
    SavingsWithdrawal {
        /// Planned amount.
        requested: Money,
        /// Amount the store released.
        withdrawn: Money,
    },
    /// Recovery debt created or extended.
    RecoveryDebtUpserted {
        /// Record as written.
        debt: RecoveryDebt,
    },
    /// Payment applied to the recovery debt and recorded in the ledger.
    RecoveryPayment {
        /// Debt paid.
        goal_id: GoalId,
        /// Amount the store applied.
        applied: Money,
    },
    /// Money added to the savings cushion.
    SavingsDeposit {
        /// Amount deposited.
        amount: Money,
        /// Balance afterwards.
        new_balance: Money,
    },
    /// Weekly report persisted.
    ReportSaved {
        /// Week the report is for.
        week_end: NaiveDate,
    },
}

impl CommitStep {
    /// True if the step moved money.
    #[must_use]
    pub fn moved_money(&self) -> bool {
        match self {
            Self::GoalContribution { applied, .. } | Self::RecoveryPayment { applied, .. } => {
                applied.is_positive()
            }
            Self::SavingsWithdrawal { withdrawn, .. } => withdrawn.is_positive(),
            Self::SavingsDeposit { amount, .. } => amount.is_positive(),
            Self::RecoveryDebtUpserted { .. } | Self::ReportSaved { .. } => false,
        }
    }

    fn past_tense(&self) -> &'static str {
        match self {
            Self::GoalContribution { .. } => "savings goals funded",
            Self::SavingsWithdrawal { .. } => "savings withdrawn",
            Self::RecoveryDebtUpserted { .. } => "recovery goal updated",
            Self::RecoveryPayment { .. } => "recovery payment recorded",
            Self::SavingsDeposit { .. } => "savings deposited",
            Self::ReportSaved { .. } => "weekly report saved",
        }
    }
}

/// The step that failed and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitFailure {
    /// Failed step.
    pub stage: CommitStage,
    /// Store error.
    pub error: StoreError,
}

/// Outcome of a commit, including partial success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitResult {
    /// Week the commit was for.
    pub week_end: NaiveDate,
    /// Steps that took effect, in order.
    pub completed: Vec<CommitStep>,
    /// First failed step; later steps were not attempted.
    pub failure: Option<CommitFailure>,
    /// Deficit left unresolved, including any withdrawal shortfall.
    pub uncovered_deficit: Money,
    /// Planned contributions the goal store did not apply. The money stays
    /// with the week's spending, like an unallocated surplus.
    pub unapplied_contributions: Money,
}

impl CommitResult {
    pub(crate) fn new(week_end: NaiveDate) -> Self {
        Self {
            week_end,
            completed: Vec::new(),
            failure: None,
            uncovered_deficit: Money::ZERO,
            unapplied_contributions: Money::ZERO,
        }
    }

    pub(crate) fn record(&mut self, step: CommitStep) {
        info!(step = step.past_tense(), moved_money = step.moved_money(), "Commit step completed");
        self.completed.push(step);
    }

    /// True if every step succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// True if any completed step moved money.
    #[must_use]
    pub fn money_moved(&self) -> bool {
        self.completed.iter().any(CommitStep::moved_money)
    }

    /// The failure as a `ReconcileError::StoreWriteFailed`.
    #[must_use]
    pub fn error(&self) -> Option<ReconcileError> {
        self.failure
            .as_ref()
            .map(|failure| ReconcileError::StoreWriteFailed {
                stage: failure.stage,
                source: failure.error.clone(),
            })
    }

    /// One-line description for the user, e.g.
    /// "savings withdrawn, but recovery goal update failed".
    #[must_use]
    pub fn summary(&self) -> String {
        let mut done: Vec<&str> = Vec::new();
        for step in &self.completed {
            let label = step.past_tense();
            if !done.contains(&label) {
                done.push(label);
            }
        }

        match (&self.failure, done.is_empty()) {
            (None, true) => "nothing to commit".to_string(),
            (None, false) => done.join(", "),
            (Some(failure), true) => format!("{} failed, nothing was changed", failure.stage),
            (Some(failure), false) => format!("{}, but {} failed", done.join(", "), failure.stage),
        }
    }
}

/// A step a commit will attempt, listed before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedStep {
    /// Store call.
    pub stage: CommitStage,
    /// Amount involved, if any.
    pub amount: Option<Money>,
    /// Goal involved, if any.
    pub goal_id: Option<GoalId>,
}

/// Lists the steps `ReconciliationCommitter::commit` would attempt for `plan`, in order.
#[must_use]
pub fn planned_steps(plan: &AllocationPlan) -> Vec<PlannedStep> {
    let mut steps = Vec::new();

    for contribution in plan.goal_contributions.iter().filter(|c| c.amount.is_positive()) {
        steps.push(PlannedStep {
            stage: CommitStage::GoalContribution,
            amount: Some(contribution.amount),
            goal_id: Some(contribution.goal_id),
        });
    }
    if plan.app_savings_withdrawal.is_positive() {
        steps.push(PlannedStep {
            stage: CommitStage::SavingsWithdrawal,
            amount: Some(plan.app_savings_withdrawal),
            goal_id: None,
        });
    }
    if plan.recovery_debt_added.is_positive() {
        steps.push(PlannedStep {
            stage: CommitStage::RecoveryDebt,
            amount: Some(plan.recovery_debt_added),
            goal_id: None,
        });
    }
    if plan.recovery_contribution.is_positive() {
        steps.push(PlannedStep {
            stage: CommitStage::RecoveryPayment,
            amount: Some(plan.recovery_contribution),
            goal_id: plan.recovery_debt_id,
        });
    }
    if plan.app_savings_deposit.is_positive() {
        steps.push(PlannedStep {
            stage: CommitStage::SavingsDeposit,
            amount: Some(plan.app_savings_deposit),
            goal_id: None,
        });
    }
    steps.push(PlannedStep {
        stage: CommitStage::Report,
        amount: None,
        goal_id: None,
    });

    steps
}
