//! Scenario classification.

use serde::{Deserialize, Serialize};
use weekclose_shared::Money;

use super::scenario::Scenario;
use crate::error::ReconcileError;
use crate::snapshot::{WeekFigures, WeekSnapshot};

/// Scenario plus the derived deficit/surplus figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Selected scenario.
    pub scenario: Scenario,
    /// `max(0, spent_on_budgets - total_budgeted)`.
    pub budget_overspend: Money,
    /// `income - total_budgeted`; negative when over-budgeted.
    pub weekly_limit: Money,
    /// Weekly limit reduced by the budget overspend, floored at zero.
    pub effective_weekly_limit: Money,
    /// Discretionary spend above the effective limit.
    pub discretionary_overspend: Money,
    /// Signed remainder for the week; negative means deficit.
    pub base_left_to_spend: Money,
    /// `max(0, -base_left_to_spend)`.
    pub total_deficit: Money,
}

impl ClassificationResult {
    /// Positive part of the base left-to-spend.
    #[must_use]
    pub fn surplus(&self) -> Money {
        self.base_left_to_spend.non_negative()
    }

    /// True if the week ended below zero.
    #[must_use]
    pub fn has_deficit(&self) -> bool {
        self.total_deficit.is_positive()
    }
}

/// Classifies a week snapshot.
pub struct ScenarioClassifier;

impl ScenarioClassifier {
    /// Validates the snapshot and classifies it.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::InvalidSnapshot` for negative or oversized amounts.
    pub fn classify(snapshot: &WeekSnapshot) -> Result<ClassificationResult, ReconcileError> {
        snapshot.validate()?;
        Ok(Self::classify_figures(&snapshot.figures()))
    }

    /// Classifies already-validated figures.
    ///
    /// Amounts must lie in `0..=Money::MAX_INPUT`; `classify` checks this.
    ///
    /// Scenario selection is first-match:
    /// 1. no overspend at all: `OnTrack`
    /// 2. budget overspend ate the whole allowance: `BudgetOverspendExhausted`
    /// 3. budget and discretionary overspend: `BudgetAndDiscretionaryOverspend`
    /// 4. budget overspend only: `BudgetOverspend`
    /// 5. discretionary overspend only: `DiscretionaryOverspendOnly`
    #[must_use]
    pub fn classify_figures(figures: &WeekFigures) -> ClassificationResult {
        let budget_overspend = (figures.spent_on_budgets - figures.total_budgeted).non_negative();
        let weekly_limit = figures.income - figures.total_budgeted;
        let effective_weekly_limit = (weekly_limit - budget_overspend).non_negative();
        let discretionary_overspend =
            (figures.discretionary_spent - effective_weekly_limit).non_negative();
        let base_left_to_spend = figures.income
            - figures.total_budgeted
            - budget_overspend
            - figures.discretionary_spent;
        let total_deficit = (-base_left_to_spend).non_negative();

        let scenario = if budget_overspend.is_zero() && discretionary_overspend.is_zero() {
            Scenario::OnTrack
        } else if budget_overspend.is_positive() && effective_weekly_limit.is_zero() {
            Scenario::BudgetOverspendExhausted
        } else if budget_overspend.is_positive() && discretionary_overspend.is_positive() {
            Scenario::BudgetAndDiscretionaryOverspend
        } else if budget_overspend.is_positive() {
            Scenario::BudgetOverspend
        } else {
            Scenario::DiscretionaryOverspendOnly
        };

        ClassificationResult {
            scenario,
            budget_overspend,
            weekly_limit,
            effective_weekly_limit,
            discretionary_overspend,
            base_left_to_spend,
            total_deficit,
        }
    }
}
