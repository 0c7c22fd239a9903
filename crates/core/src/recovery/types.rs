//! Recovery debt data types.

use serde::{Deserialize, Serialize};
use weekclose_shared::{GoalId, Money};

use crate::error::ReconcileError;

/// Number of weeks a recovery debt is spread over (1..=24).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct AmortizationWeeks(u32);

impl AmortizationWeeks {
    /// Shortest window.
    pub const MIN: u32 = 1;
    /// Longest window.
    pub const MAX: u32 = 24;
    /// Window used for a brand-new debt when nothing else is configured.
    pub const DEFAULT: Self = Self(4);

    /// Validates a week count.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::AmortizationOutOfRange` outside 1..=24.
    pub fn new(weeks: u32) -> Result<Self, ReconcileError> {
        if (Self::MIN..=Self::MAX).contains(&weeks) {
            Ok(Self(weeks))
        } else {
            Err(ReconcileError::AmortizationOutOfRange(weeks))
        }
    }

    /// Returns the number of weeks.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for AmortizationWeeks {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for AmortizationWeeks {
    type Error = ReconcileError;

    fn try_from(weeks: u32) -> Result<Self, Self::Error> {
        Self::new(weeks)
    }
}

impl From<AmortizationWeeks> for u32 {
    fn from(weeks: AmortizationWeeks) -> Self {
        weeks.0
    }
}

/// The persisted recovery debt record, owned by the goal store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryDebt {
    /// Goal ID of the debt record.
    pub id: GoalId,
    /// Cumulative amount, including the already-paid portion.
    pub total_amount: Money,
    /// Paid to date.
    pub saved_amount: Money,
    /// Scheduled weekly payment.
    pub weekly_contribution: Money,
    /// Amortization window the weekly payment was computed over.
    pub amortization_weeks: AmortizationWeeks,
    /// Lifetime total of deficits ever added. Never decreases.
    pub original_deficit: Money,
}

impl RecoveryDebt {
    /// Unpaid balance, clamped at zero.
    #[must_use]
    pub fn remaining(&self) -> Money {
        (self.total_amount - self.saved_amount).non_negative()
    }

    /// True once `total_amount - saved_amount <= 0`.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.remaining().is_zero()
    }

    /// Records a payment, capped at the remaining balance.
    ///
    /// Returns the amount actually applied.
    pub fn apply_payment(&mut self, amount: Money) -> Money {
        let applied = amount.clamp_between(Money::ZERO, self.remaining());
        self.saved_amount += applied;
        applied
    }
}

/// Whether a recovery debt is outstanding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "debt", rename_all = "snake_case")]
pub enum RecoveryState {
    /// Nothing owed.
    #[default]
    None,
    /// One debt with a positive remaining balance.
    Active(RecoveryDebt),
}

impl RecoveryState {
    /// Builds the state from the goal store's record; settled records count as `None`.
    #[must_use]
    pub fn from_record(record: Option<RecoveryDebt>) -> Self {
        match record {
            Some(debt) if !debt.is_settled() => Self::Active(debt),
            _ => Self::None,
        }
    }

    /// The active debt, if any.
    #[must_use]
    pub fn active(&self) -> Option<&RecoveryDebt> {
        match self {
            Self::None => None,
            Self::Active(debt) => Some(debt),
        }
    }

    /// Unpaid balance, zero when nothing is owed.
    #[must_use]
    pub fn remaining(&self) -> Money {
        self.active().map_or(Money::ZERO, RecoveryDebt::remaining)
    }

    /// Scheduled weekly payment, zero when nothing is owed.
    #[must_use]
    pub fn weekly_contribution(&self) -> Money {
        self.active().map_or(Money::ZERO, |debt| debt.weekly_contribution)
    }
}
