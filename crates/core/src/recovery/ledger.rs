//! Create-or-extend logic for the single recovery debt.

use weekclose_shared::{GoalId, Money};

use super::types::{AmortizationWeeks, RecoveryDebt};

/// Turns an uncovered deficit into a recovery debt record.
pub struct RecoveryLedger;

impl RecoveryLedger {
    /// Computes the record to upsert for `remaining_deficit`.
    ///
    /// With no existing record a new debt is created. Otherwise the existing
    /// record is extended in place: its paid history is preserved, the
    /// deficit is added to `original_deficit`, and the weekly payment is
    /// recomputed over the new window from everything still owed.
    /// `saved_amount` is never touched here.
    #[must_use]
    pub fn upsert(
        existing: Option<&RecoveryDebt>,
        remaining_deficit: Money,
        weeks: AmortizationWeeks,
    ) -> RecoveryDebt {
        let deficit = remaining_deficit.non_negative();

        match existing {
            None => RecoveryDebt {
                id: GoalId::new(),
                total_amount: deficit,
                saved_amount: Money::ZERO,
                weekly_contribution: deficit.split_weeks(weeks.get()),
                amortization_weeks: weeks,
                original_deficit: deficit,
            },
            Some(debt) => {
                let outstanding = debt.remaining() + deficit;
                RecoveryDebt {
                    id: debt.id,
                    total_amount: debt.saved_amount + outstanding,
                    saved_amount: debt.saved_amount,
                    weekly_contribution: outstanding.split_weeks(weeks.get()),
                    amortization_weeks: weeks,
                    original_deficit: debt.original_deficit + deficit,
                }
            }
        }
    }
}
