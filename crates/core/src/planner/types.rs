//! Allocation plan and override types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use weekclose_shared::{GoalId, Money, ReconcileConfig};

use crate::classify::ClassificationResult;
use crate::recovery::AmortizationWeeks;

/// One contribution to a savings goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalContribution {
    /// Savings goal.
    pub goal_id: GoalId,
    /// Amount to contribute.
    pub amount: Money,
}

/// How savings goals are chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "goals", rename_all = "snake_case")]
pub enum GoalSelection {
    /// All goals at their default contribution if they all fit in the
    /// surplus, otherwise none.
    #[default]
    Auto,
    /// Exactly these contributions, surplus or not.
    Manual(Vec<GoalContribution>),
}

/// The choices a user makes on top of the default plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserOverrides {
    /// Savings goal selection.
    pub goal_selection: GoalSelection,
    /// Cover a deficit from the savings cushion first.
    pub use_app_savings_for_recovery: bool,
    /// Put an uncovered deficit on the recovery debt.
    pub create_or_add_to_recovery: bool,
    /// Amortization window; defaults to the existing debt's window.
    pub amortization_weeks: Option<u32>,
    /// Deposit unallocated surplus into the savings cushion.
    pub deposit_surplus_to_app_savings: bool,
}

impl Default for UserOverrides {
    fn default() -> Self {
        Self {
            goal_selection: GoalSelection::Auto,
            use_app_savings_for_recovery: true,
            create_or_add_to_recovery: true,
            amortization_weeks: None,
            deposit_surplus_to_app_savings: false,
        }
    }
}

impl UserOverrides {
    /// Starting overrides taken from configuration.
    #[must_use]
    pub fn from_config(config: &ReconcileConfig) -> Self {
        Self {
            use_app_savings_for_recovery: config.use_app_savings_for_recovery,
            create_or_add_to_recovery: config.create_or_add_to_recovery,
            ..Self::default()
        }
    }
}

/// Whether the week ends with money to distribute or money to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanMode {
    /// Surplus to distribute.
    Surplus,
    /// Deficit to cover.
    Deficit,
    /// Nothing either way.
    Balanced,
}

/// Who gets how much when the week is closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationPlan {
    /// Classification the plan was derived from.
    pub classification: ClassificationResult,
    /// Surplus, deficit, or balanced.
    pub mode: PlanMode,
    /// Payment towards the existing recovery debt.
    pub recovery_contribution: Money,
    /// Debt the payment goes to.
    pub recovery_debt_id: Option<GoalId>,
    /// Selected savings goals and their amounts.
    pub goal_contributions: Vec<GoalContribution>,
    /// Deposit into the savings cushion.
    pub app_savings_deposit: Money,
    /// Withdrawal from the savings cushion to cover the deficit.
    pub app_savings_withdrawal: Money,
    /// Deficit moved onto the recovery debt.
    pub recovery_debt_added: Money,
    /// Remaining balance of the recovery debt after this week, when it changes.
    pub new_or_updated_recovery_debt: Option<Money>,
    /// Weekly payment for the new or extended debt.
    pub recovery_weekly_payment: Option<Money>,
    /// Amortization window for the new or extended debt.
    pub amortization_weeks: AmortizationWeeks,
    /// Whether an uncovered deficit goes to the recovery debt.
    pub create_or_add_to_recovery: bool,
    /// Surplus left where it is.
    pub unallocated_surplus: Money,
    /// Deficit nobody covered; the host must present it as unresolved.
    pub uncovered_deficit: Money,
}

impl AllocationPlan {
    /// IDs of the selected savings goals.
    #[must_use]
    pub fn selected_goal_ids(&self) -> BTreeSet<GoalId> {
        self.goal_contributions.iter().map(|c| c.goal_id).collect()
    }

    /// Sum of all savings goal contributions.
    #[must_use]
    pub fn savings_contributions_total(&self) -> Money {
        self.goal_contributions.iter().map(|c| c.amount).sum()
    }

    /// Every destination of the week's money, signed the same way as
    /// `base_left_to_spend`. Equals it for every plan the planner builds.
    #[must_use]
    pub fn accounted_total(&self) -> Money {
        self.recovery_contribution
            + self.savings_contributions_total()
            + self.app_savings_deposit
            + self.unallocated_surplus
            - self.app_savings_withdrawal
            - self.recovery_debt_added
            - self.uncovered_deficit
    }

    /// True if no amount was created or destroyed.
    #[must_use]
    pub fn is_conserved(&self) -> bool {
        self.accounted_total() == self.classification.base_left_to_spend
    }

    /// True if the plan moves no money at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recovery_contribution.is_zero()
            && self.goal_contributions.iter().all(|c| c.amount.is_zero())
            && self.app_savings_deposit.is_zero()
            && self.app_savings_withdrawal.is_zero()
            && self.recovery_debt_added.is_zero()
    }
}
