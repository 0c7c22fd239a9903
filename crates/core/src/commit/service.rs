//! Reconciliation committer.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, error, info, warn};
use weekclose_shared::{Money, StoreError};

use super::result::{CommitFailure, CommitResult, CommitStage, CommitStep};
use crate::planner::AllocationPlan;
use crate::ports::{
    GoalStore, LedgerCategory, LedgerEntry, ReportStore, SavingsBalanceStore, TransactionLedger,
};
use crate::recovery::RecoveryLedger;
use crate::report::WeekReport;

/// Applies allocation plans to the stores.
pub struct ReconciliationCommitter<G, S, T, R>
where
    G: GoalStore,
    S: SavingsBalanceStore,
    T: TransactionLedger,
    R: ReportStore,
{
    goals: Arc<G>,
    savings: Arc<S>,
    ledger: Arc<T>,
    reports: Arc<R>,
}

/// Amounts that actually moved, as opposed to what was planned.
#[derive(Default)]
struct Moved {
    contributed: Money,
    withdrawn: Money,
    debt_added: Money,
    recovery_paid: Money,
    deposited: Money,
}

fn fail(stage: CommitStage) -> impl FnOnce(StoreError) -> CommitFailure {
    move |error| CommitFailure { stage, error }
}

impl<G, S, T, R> ReconciliationCommitter<G, S, T, R>
where
    G: GoalStore,
    S: SavingsBalanceStore,
    T: TransactionLedger,
    R: ReportStore,
{
    /// Create a new committer.
    #[must_use]
    pub fn new(goals: Arc<G>, savings: Arc<S>, ledger: Arc<T>, reports: Arc<R>) -> Self {
        Self {
            goals,
            savings,
            ledger,
            reports,
        }
    }

    /// Applies `plan` for the week ending `week_end`.
    ///
    /// Steps run in order: goal contributions, cushion withdrawal, recovery
    /// debt update and payment, cushion deposit, weekly report. The first
    /// failing step stops the commit; completed steps stay in effect and are
    /// listed in the result.
    #[tracing::instrument(skip_all, fields(week_end = %week_end, mode = ?plan.mode))]
    pub async fn commit(&self, plan: &AllocationPlan, week_end: NaiveDate) -> CommitResult {
        let mut result = CommitResult::new(week_end);

        match self.run(plan, week_end, &mut result).await {
            Ok(()) => {
                info!(steps = result.completed.len(), "Week committed");
            }
            Err(failure) => {
                error!(
                    stage = %failure.stage,
                    error = %failure.error,
                    completed = result.completed.len(),
                    money_moved = result.money_moved(),
                    "Commit stopped"
                );
                result.failure = Some(failure);
            }
        }

        result
    }

    async fn run(
        &self,
        plan: &AllocationPlan,
        week_end: NaiveDate,
        result: &mut CommitResult,
    ) -> Result<(), CommitFailure> {
        let mut moved = Moved::default();
        result.uncovered_deficit = plan.uncovered_deficit;

        // 1. Savings goals
        for contribution in plan.goal_contributions.iter().filter(|c| c.amount.is_positive()) {
            let applied = self
                .goals
                .add_contribution(contribution.goal_id, contribution.amount)
                .await
                .map_err(fail(CommitStage::GoalContribution))?;

            let gap = (contribution.amount - applied).non_negative();
            if gap.is_positive() {
                warn!(
                    goal_id = %contribution.goal_id,
                    requested = %contribution.amount,
                    applied = %applied,
                    "Goal store applied less than planned"
                );
                result.unapplied_contributions += gap;
            }
            moved.contributed += applied;
            result.record(CommitStep::GoalContribution {
                goal_id: contribution.goal_id,
                requested: contribution.amount,
                applied,
            });

            if applied.is_positive() {
                let entry = LedgerEntry::new(
                    applied,
                    format!("Savings goal contribution ({})", contribution.goal_id),
                    week_end,
                    LedgerCategory::GoalContribution,
                );
                self.ledger
                    .insert(entry)
                    .await
                    .map_err(fail(CommitStage::GoalLedgerEntry))?;
            }
        }

        // 2. Cushion withdrawal
        let mut shortfall = Money::ZERO;
        if plan.app_savings_withdrawal.is_positive() {
            let withdrawn = self
                .savings
                .withdraw(plan.app_savings_withdrawal)
                .await
                .map_err(fail(CommitStage::SavingsWithdrawal))?;

            shortfall = (plan.app_savings_withdrawal - withdrawn).non_negative();
            if shortfall.is_positive() {
                warn!(
                    requested = %plan.app_savings_withdrawal,
                    withdrawn = %withdrawn,
                    "Savings cushion covered less than planned"
                );
            }
            moved.withdrawn = withdrawn;
            result.record(CommitStep::SavingsWithdrawal {
                requested: plan.app_savings_withdrawal,
                withdrawn,
            });
        }

        // 3. Recovery debt
        let mut debt_to_add = plan.recovery_debt_added;
        if plan.create_or_add_to_recovery {
            debt_to_add += shortfall;
        } else {
            result.uncovered_deficit += shortfall;
        }

        if debt_to_add.is_positive() {
            let existing = self
                .goals
                .list_active_recovery_debt()
                .await
                .map_err(fail(CommitStage::RecoveryDebt))?;
            let debt = RecoveryLedger::upsert(existing.as_ref(), debt_to_add, plan.amortization_weeks);
            debug!(debt_id = %debt.id, remaining = %debt.remaining(), "Upserting recovery debt");

            self.goals
                .upsert_recovery_debt(debt.clone())
                .await
                .map_err(fail(CommitStage::RecoveryDebt))?;
            moved.debt_added = debt_to_add;
            result.record(CommitStep::RecoveryDebtUpserted { debt });
        }

        if let Some(debt_id) = plan.recovery_debt_id
            && plan.recovery_contribution.is_positive()
        {
            let applied = self
                .goals
                .add_contribution(debt_id, plan.recovery_contribution)
                .await
                .map_err(fail(CommitStage::RecoveryPayment))?;

            let gap = (plan.recovery_contribution - applied).non_negative();
            if gap.is_positive() {
                warn!(
                    requested = %plan.recovery_contribution,
                    applied = %applied,
                    "Recovery debt accepted less than planned"
                );
                result.unapplied_contributions += gap;
            }
            moved.recovery_paid = applied;
            result.record(CommitStep::RecoveryPayment {
                goal_id: debt_id,
                applied,
            });

            if applied.is_positive() {
                let entry = LedgerEntry::new(
                    applied,
                    "Recovery payment",
                    week_end,
                    LedgerCategory::RecoveryPayment,
                );
                self.ledger
                    .insert(entry)
                    .await
                    .map_err(fail(CommitStage::RecoveryLedgerEntry))?;
            }
        }

        // 4. Cushion deposit
        if plan.app_savings_deposit.is_positive() {
            let new_balance = self
                .savings
                .add(plan.app_savings_deposit)
                .await
                .map_err(fail(CommitStage::SavingsDeposit))?;
            moved.deposited = plan.app_savings_deposit;
            result.record(CommitStep::SavingsDeposit {
                amount: plan.app_savings_deposit,
                new_balance,
            });
        }

        // 5. Weekly report, with the amounts that actually moved
        let report = WeekReport {
            savings_contributed: moved.contributed,
            recovery_paid: moved.recovery_paid,
            recovery_debt_added: moved.debt_added,
            app_savings_change: moved.deposited - moved.withdrawn,
            ..WeekReport::from_plan(plan, week_end)
        };
        self.reports
            .upsert(report)
            .await
            .map_err(fail(CommitStage::Report))?;
        result.record(CommitStep::ReportSaved { week_end });

        Ok(())
    }
}
