//! Allocation planning.
//!
//! The planner is pure: the host re-invokes it whenever the user changes an
//! override and only commits the final plan.

use std::collections::BTreeSet;

use weekclose_shared::{Money, ReconcileConfig};

use super::types::{AllocationPlan, GoalContribution, GoalSelection, PlanMode, UserOverrides};
use crate::classify::ClassificationResult;
use crate::error::ReconcileError;
use crate::recovery::AmortizationWeeks;
use crate::snapshot::WeekSnapshot;

/// Builds allocation plans.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocationPlanner {
    default_amortization: AmortizationWeeks,
}

impl AllocationPlanner {
    /// Creates a planner with the window used for brand-new debts.
    #[must_use]
    pub const fn new(default_amortization: AmortizationWeeks) -> Self {
        Self {
            default_amortization,
        }
    }

    /// Creates a planner from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::AmortizationOutOfRange` for a bad default window.
    pub fn from_config(config: &ReconcileConfig) -> Result<Self, ReconcileError> {
        Ok(Self::new(AmortizationWeeks::new(
            config.default_amortization_weeks,
        )?))
    }

    /// Plans the distribution of the week's surplus or deficit.
    ///
    /// Savings goal contributions come first. Whatever is left over pays
    /// down the recovery debt, then may be deposited to the savings
    /// cushion. If contributions exceed what the week produced, the shortfall
    /// is a deficit: covered from the savings cushion, then moved onto the
    /// recovery debt, and otherwise reported as uncovered.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot is invalid, the amortization window
    /// is out of range, or a manual selection names an unknown goal or
    /// gives a goal more than it still needs.
    pub fn plan(
        &self,
        snapshot: &WeekSnapshot,
        classification: &ClassificationResult,
        overrides: &UserOverrides,
    ) -> Result<AllocationPlan, ReconcileError> {
        snapshot.validate()?;
        let amortization_weeks = self.resolve_weeks(snapshot, overrides)?;
        let base_left = classification.base_left_to_spend;
        let existing_remaining = snapshot.existing_recovery_remaining();

        let goal_contributions = match &overrides.goal_selection {
            GoalSelection::Auto => Self::auto_select(snapshot, classification),
            GoalSelection::Manual(contributions) => {
                Self::validate_manual(snapshot, contributions)?;
                contributions.clone()
            }
        };
        let selected_total: Money = goal_contributions.iter().map(|c| c.amount).sum();

        let mut plan = AllocationPlan {
            classification: *classification,
            mode: PlanMode::Balanced,
            recovery_contribution: Money::ZERO,
            recovery_debt_id: snapshot.recovery.active().map(|debt| debt.id),
            goal_contributions,
            app_savings_deposit: Money::ZERO,
            app_savings_withdrawal: Money::ZERO,
            recovery_debt_added: Money::ZERO,
            new_or_updated_recovery_debt: None,
            recovery_weekly_payment: None,
            amortization_weeks,
            create_or_add_to_recovery: overrides.create_or_add_to_recovery,
            unallocated_surplus: Money::ZERO,
            uncovered_deficit: Money::ZERO,
        };

        let net = base_left - selected_total;
        if net.is_positive() {
            plan.mode = PlanMode::Surplus;

            // Leftover after savings becomes a (possibly bonus) debt payment.
            plan.recovery_contribution = net.clamp_between(Money::ZERO, existing_remaining);
            if plan.recovery_contribution.is_positive() {
                plan.new_or_updated_recovery_debt =
                    Some(existing_remaining - plan.recovery_contribution);
            }

            let unallocated = net - plan.recovery_contribution;
            if overrides.deposit_surplus_to_app_savings {
                plan.app_savings_deposit = unallocated;
            } else {
                plan.unallocated_surplus = unallocated;
            }
        } else if net.is_negative() {
            plan.mode = PlanMode::Deficit;

            // Saving on purpose while in deficit increases what must be recovered.
            let deficit = -net;
            if overrides.use_app_savings_for_recovery && snapshot.app_savings_balance.is_positive()
            {
                plan.app_savings_withdrawal =
                    deficit.clamp_between(Money::ZERO, snapshot.app_savings_balance);
            }

            let remaining_deficit = deficit - plan.app_savings_withdrawal;
            if remaining_deficit.is_positive() {
                if overrides.create_or_add_to_recovery {
                    let new_total = existing_remaining + remaining_deficit;
                    plan.recovery_debt_added = remaining_deficit;
                    plan.new_or_updated_recovery_debt = Some(new_total);
                    plan.recovery_weekly_payment =
                        Some(new_total.split_weeks(amortization_weeks.get()));
                } else {
                    plan.uncovered_deficit = remaining_deficit;
                }
            }
        }

        Ok(plan)
    }

    /// All-or-nothing selection of every active goal at its default amount,
    /// capped at what the goal still needs.
    ///
    /// Goals are only auto-selected in a surplus week, and only if their
    /// combined capped contribution fits in what remains after the
    /// scheduled debt payment.
    fn auto_select(
        snapshot: &WeekSnapshot,
        classification: &ClassificationResult,
    ) -> Vec<GoalContribution> {
        let base_left = classification.base_left_to_spend;
        if !base_left.is_positive() || snapshot.savings_goals.is_empty() {
            return Vec::new();
        }

        let existing_remaining = snapshot.existing_recovery_remaining();
        let initial_recovery = if existing_remaining.is_positive() {
            let scheduled = snapshot.recovery.weekly_contribution().min(existing_remaining);
            base_left.clamp_between(Money::ZERO, scheduled)
        } else {
            Money::ZERO
        };
        let available_for_savings = base_left - initial_recovery;

        let contributions: Vec<GoalContribution> = snapshot
            .savings_goals
            .iter()
            .map(|goal| GoalContribution {
                goal_id: goal.id,
                amount: goal.capped_contribution(),
            })
            .collect();
        let savings_total: Money = contributions.iter().map(|c| c.amount).sum();
        if savings_total > available_for_savings {
            return Vec::new();
        }

        contributions
    }

    fn validate_manual(
        snapshot: &WeekSnapshot,
        contributions: &[GoalContribution],
    ) -> Result<(), ReconcileError> {
        let mut seen = BTreeSet::new();
        for contribution in contributions {
            let Some(goal) = snapshot.savings_goal(contribution.goal_id) else {
                return Err(ReconcileError::invalid_override(format!(
                    "unknown savings goal {}",
                    contribution.goal_id
                )));
            };
            if !seen.insert(contribution.goal_id) {
                return Err(ReconcileError::invalid_override(format!(
                    "savings goal {} selected twice",
                    contribution.goal_id
                )));
            }
            if contribution.amount.is_negative() {
                return Err(ReconcileError::invalid_override(format!(
                    "contribution to {} must not be negative",
                    contribution.goal_id
                )));
            }
            if contribution.amount > goal.remaining {
                return Err(ReconcileError::invalid_override(format!(
                    "contribution of {} to {} exceeds the {} it still needs",
                    contribution.amount, contribution.goal_id, goal.remaining
                )));
            }
        }
        Ok(())
    }

    /// Override, else the existing debt's window, else the default.
    fn resolve_weeks(
        &self,
        snapshot: &WeekSnapshot,
        overrides: &UserOverrides,
    ) -> Result<AmortizationWeeks, ReconcileError> {
        match overrides.amortization_weeks {
            Some(weeks) => AmortizationWeeks::new(weeks),
            None => Ok(snapshot
                .recovery
                .active()
                .map_or(self.default_amortization, |debt| debt.amortization_weeks)),
        }
    }
}
