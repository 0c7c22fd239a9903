//! Weekly report data types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use weekclose_shared::Money;

use crate::classify::Scenario;
use crate::planner::AllocationPlan;

/// Snapshot of a closed week, kept for streaks and history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekReport {
    /// Last day of the week.
    pub week_end: NaiveDate,
    /// Scenario the week fell into.
    pub scenario: Scenario,
    /// Budget category overspend.
    pub budget_overspend: Money,
    /// Discretionary overspend.
    pub discretionary_overspend: Money,
    /// Discretionary allowance after budget overspend.
    pub effective_weekly_limit: Money,
    /// Signed remainder for the week.
    pub base_left_to_spend: Money,
    /// Deficit, zero if none.
    pub total_deficit: Money,
    /// Total contributed to savings goals.
    pub savings_contributed: Money,
    /// Paid towards the recovery debt.
    pub recovery_paid: Money,
    /// Added to the recovery debt.
    pub recovery_debt_added: Money,
    /// Net change of the savings cushion.
    pub app_savings_change: Money,
}

impl WeekReport {
    /// Builds the report for a planned week.
    #[must_use]
    pub fn from_plan(plan: &AllocationPlan, week_end: NaiveDate) -> Self {
        let c = &plan.classification;
        Self {
            week_end,
            scenario: c.scenario,
            budget_overspend: c.budget_overspend,
            discretionary_overspend: c.discretionary_overspend,
            effective_weekly_limit: c.effective_weekly_limit,
            base_left_to_spend: c.base_left_to_spend,
            total_deficit: c.total_deficit,
            savings_contributed: plan.savings_contributions_total(),
            recovery_paid: plan.recovery_contribution,
            recovery_debt_added: plan.recovery_debt_added,
            app_savings_change: plan.app_savings_deposit - plan.app_savings_withdrawal,
        }
    }

    /// On track with nothing to recover.
    #[must_use]
    pub fn is_on_track(&self) -> bool {
        self.scenario == Scenario::OnTrack && self.total_deficit.is_zero()
    }
}
