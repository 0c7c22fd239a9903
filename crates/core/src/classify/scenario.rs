//! Week scenario enumeration.

use serde::{Deserialize, Serialize};

/// Which overspend situation a week falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// No budget or discretionary overspend.
    OnTrack,
    /// Budgets overspent, discretionary spend still within the reduced limit.
    BudgetOverspend,
    /// Budget overspend consumed the whole discretionary allowance.
    BudgetOverspendExhausted,
    /// Both budgets and the reduced discretionary limit overspent.
    BudgetAndDiscretionaryOverspend,
    /// Budgets on track, discretionary limit overspent.
    DiscretionaryOverspendOnly,
}

impl Scenario {
    /// Every scenario, in selection order.
    pub const ALL: [Self; 5] = [
        Self::OnTrack,
        Self::BudgetOverspendExhausted,
        Self::BudgetAndDiscretionaryOverspend,
        Self::BudgetOverspend,
        Self::DiscretionaryOverspendOnly,
    ];

    /// True if any category budget was overspent.
    #[must_use]
    pub const fn has_budget_overspend(self) -> bool {
        matches!(
            self,
            Self::BudgetOverspend
                | Self::BudgetOverspendExhausted
                | Self::BudgetAndDiscretionaryOverspend
        )
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OnTrack => write!(f, "on track"),
            Self::BudgetOverspend => write!(f, "budget overspend"),
            Self::BudgetOverspendExhausted => write!(f, "budget overspend, allowance exhausted"),
            Self::BudgetAndDiscretionaryOverspend => {
                write!(f, "budget and discretionary overspend")
            }
            Self::DiscretionaryOverspendOnly => write!(f, "discretionary overspend"),
        }
    }
}
