//! Week snapshot data types.

use serde::{Deserialize, Serialize};
use weekclose_shared::{GoalId, Money};

use crate::error::ReconcileError;
use crate::recovery::RecoveryState;

/// Reference to an active savings goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsGoalRef {
    /// Goal ID.
    pub id: GoalId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Amount still needed to reach the target.
    pub remaining: Money,
    /// Contribution suggested every week.
    pub default_weekly_contribution: Money,
}

impl SavingsGoalRef {
    /// The default weekly contribution, never more than the goal still needs.
    #[must_use]
    pub fn capped_contribution(&self) -> Money {
        self.default_weekly_contribution
            .clamp_between(Money::ZERO, self.remaining)
    }
}

/// The week's income, budget and spend figures, as computed by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekFigures {
    /// Expected income for the week.
    pub income: Money,
    /// Sum of all category budget limits.
    pub total_budgeted: Money,
    /// Actual spend inside budgeted categories.
    pub spent_on_budgets: Money,
    /// Actual spend outside budgeted categories.
    pub discretionary_spent: Money,
}

/// Everything needed to close one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSnapshot {
    /// Expected income for the week.
    pub income: Money,
    /// Sum of all category budget limits.
    pub total_budgeted: Money,
    /// Actual spend inside budgeted categories.
    pub spent_on_budgets: Money,
    /// Actual spend outside budgeted categories.
    pub discretionary_spent: Money,
    /// Outstanding recovery debt.
    #[serde(default)]
    pub recovery: RecoveryState,
    /// Current balance of the savings cushion.
    #[serde(default)]
    pub app_savings_balance: Money,
    /// Active savings goals.
    #[serde(default)]
    pub savings_goals: Vec<SavingsGoalRef>,
}

impl WeekSnapshot {
    /// Builds and validates a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::InvalidSnapshot` if any amount is negative or
    /// above `Money::MAX_INPUT`.
    pub fn new(
        figures: WeekFigures,
        recovery: RecoveryState,
        app_savings_balance: Money,
        savings_goals: Vec<SavingsGoalRef>,
    ) -> Result<Self, ReconcileError> {
        let snapshot = Self {
            income: figures.income,
            total_budgeted: figures.total_budgeted,
            spent_on_budgets: figures.spent_on_budgets,
            discretionary_spent: figures.discretionary_spent,
            recovery,
            app_savings_balance,
            savings_goals,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// The income/budget/spend part of the snapshot.
    #[must_use]
    pub fn figures(&self) -> WeekFigures {
        WeekFigures {
            income: self.income,
            total_budgeted: self.total_budgeted,
            spent_on_budgets: self.spent_on_budgets,
            discretionary_spent: self.discretionary_spent,
        }
    }

    /// Unpaid balance of the active recovery debt, zero if none.
    #[must_use]
    pub fn existing_recovery_remaining(&self) -> Money {
        self.recovery.remaining()
    }

    /// Looks up a savings goal by ID.
    #[must_use]
    pub fn savings_goal(&self, id: GoalId) -> Option<&SavingsGoalRef> {
        self.savings_goals.iter().find(|goal| goal.id == id)
    }

    /// Rejects negative or oversized amounts anywhere in the snapshot.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::InvalidSnapshot` naming the first offending field.
    pub fn validate(&self) -> Result<(), ReconcileError> {
        in_input_range("income", self.income)?;
        in_input_range("total_budgeted", self.total_budgeted)?;
        in_input_range("spent_on_budgets", self.spent_on_budgets)?;
        in_input_range("discretionary_spent", self.discretionary_spent)?;
        in_input_range("app_savings_balance", self.app_savings_balance)?;

        if let Some(debt) = self.recovery.active() {
            in_input_range("recovery.total_amount", debt.total_amount)?;
            in_input_range("recovery.saved_amount", debt.saved_amount)?;
            in_input_range("recovery.weekly_contribution", debt.weekly_contribution)?;
            in_input_range("recovery.original_deficit", debt.original_deficit)?;
        }

        for goal in &self.savings_goals {
            in_input_range(&format!("savings_goals[{}].remaining", goal.id), goal.remaining)?;
            in_input_range(
                &format!("savings_goals[{}].default_weekly_contribution", goal.id),
                goal.default_weekly_contribution,
            )?;
        }

        Ok(())
    }
}

fn in_input_range(field: &str, value: Money) -> Result<(), ReconcileError> {
    if value.is_negative() {
        return Err(ReconcileError::invalid_snapshot(
            field,
            format!("must not be negative, got {value}"),
        ));
    }
    if value > Money::MAX_INPUT {
        return Err(ReconcileError::invalid_snapshot(
            field,
            format!("must not exceed {}, got {value}", Money::MAX_INPUT),
        ));
    }
    Ok(())
}
