//! Fixed-point money type.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are stored as a signed count of cents; `rust_decimal::Decimal`
//! is only used at the edges (parsing, serialization, display).

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when converting an external value into [`Money`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The value was NaN or infinite.
    #[error("amount is not a finite number")]
    NonFinite,

    /// The value does not fit in the cent range.
    #[error("amount {0} is out of range")]
    OutOfRange(String),
}

/// A monetary amount with two-decimal precision.
///
/// The value is signed so that intermediate figures such as a week's
/// left-to-spend can go negative; inputs that must be non-negative are
/// validated by their owners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Largest amount accepted as input: 10 billion units.
    ///
    /// Sums and differences of a handful of inputs stay far inside `i64`.
    pub const MAX_INPUT: Self = Self(1_000_000_000_000);

    /// Creates an amount from a count of cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Creates an amount from whole currency units.
    #[must_use]
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    /// Converts a decimal, rounding to the cent with banker's rounding.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::OutOfRange` if the value does not fit in `i64` cents.
    pub fn from_decimal(value: Decimal) -> Result<Self, MoneyError> {
        let cents = (value * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
        cents
            .to_i64()
            .map(Self)
            .ok_or_else(|| MoneyError::OutOfRange(value.to_string()))
    }

    /// Converts a float, rejecting NaN and infinities.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::NonFinite` for NaN/infinite input.
    pub fn from_f64(value: f64) -> Result<Self, MoneyError> {
        if !value.is_finite() {
            return Err(MoneyError::NonFinite);
        }
        let decimal =
            Decimal::from_f64(value).ok_or_else(|| MoneyError::OutOfRange(value.to_string()))?;
        Self::from_decimal(decimal)
    }

    /// Returns the amount in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns the amount as a two-decimal `Decimal`.
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns true if the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// `max(0, self)`.
    #[must_use]
    pub fn non_negative(self) -> Self {
        self.max(Self::ZERO)
    }

    /// Clamps into `[low, high]`. A `high` below `low` collapses to `low`.
    #[must_use]
    pub fn clamp_between(self, low: Self, high: Self) -> Self {
        self.min(high).max(low)
    }

    /// Splits the amount into `weeks` equal instalments, rounded to the cent.
    ///
    /// Returns zero for `weeks == 0`.
    #[must_use]
    pub fn split_weeks(self, weeks: u32) -> Self {
        if weeks == 0 {
            return Self::ZERO;
        }
        let per_week = (Decimal::from(self.0) / Decimal::from(weeks))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
        Self(per_week.to_i64().unwrap_or(0))
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.to_decimal()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
