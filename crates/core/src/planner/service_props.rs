//! Property-based tests for AllocationPlanner.
//!
//! - Conservation: every cent of the base left-to-spend has exactly one destination
//! - All-or-nothing automatic savings goal selection

use proptest::prelude::*;
use weekclose_shared::{GoalId, Money};

use super::service::AllocationPlanner;
use super::types::{PlanMode, UserOverrides};
use crate::classify::ScenarioClassifier;
use crate::recovery::{AmortizationWeeks, RecoveryDebt, RecoveryState};
use crate::snapshot::{SavingsGoalRef, WeekFigures, WeekSnapshot};

/// Strategy for amounts from 0.00 to 2,000.00.
fn amount() -> impl Strategy<Value = Money> {
    (0i64..200_000).prop_map(Money::from_cents)
}

fn goals_strategy() -> impl Strategy<Value = Vec<SavingsGoalRef>> {
    prop::collection::vec(
        (0i64..20_000, 0i64..100_000).prop_map(|(weekly, remaining)| SavingsGoalRef {
            id: GoalId::new(),
            name: String::new(),
            remaining: Money::from_cents(remaining),
            default_weekly_contribution: Money::from_cents(weekly),
        }),
        0..4,
    )
}

fn recovery_strategy() -> impl Strategy<Value = RecoveryState> {
    prop_oneof![
        Just(RecoveryState::None),
        (0i64..100_000, 0i64..100_000, 0i64..20_000, 1u32..=24).prop_map(
            |(total, saved, weekly, weeks)| {
                RecoveryState::from_record(Some(RecoveryDebt {
                    id: GoalId::new(),
                    total_amount: Money::from_cents(total),
                    saved_amount: Money::from_cents(saved),
                    weekly_contribution: Money::from_cents(weekly),
                    amortization_weeks: AmortizationWeeks::new(weeks).unwrap_or_default(),
                    original_deficit: Money::from_cents(total),
                }))
            }
        ),
    ]
}

fn overrides_strategy() -> impl Strategy<Value = UserOverrides> {
    (any::<bool>(), any::<bool>(), any::<bool>(), prop::option::of(1u32..=24)).prop_map(
        |(use_savings, create, deposit, weeks)| UserOverrides {
            use_app_savings_for_recovery: use_savings,
            create_or_add_to_recovery: create,
            deposit_surplus_to_app_savings: deposit,
            amortization_weeks: weeks,
            ..UserOverrides::default()
        },
    )
}

fn snapshot_strategy() -> impl Strategy<Value = WeekSnapshot> {
    (
        amount(),
        amount(),
        amount(),
        amount(),
        recovery_strategy(),
        amount(),
        goals_strategy(),
    )
        .prop_map(
            |(income, total_budgeted, spent_on_budgets, discretionary_spent, recovery, balance, goals)| {
                WeekSnapshot {
                    income,
                    total_budgeted,
                    spent_on_budgets,
                    discretionary_spent,
                    recovery,
                    app_savings_balance: balance,
                    savings_goals: goals,
                }
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// No amount is created or destroyed by the planner.
    #[test]
    fn prop_plan_conserves_money(
        snapshot in snapshot_strategy(),
        overrides in overrides_strategy(),
    ) {
        let classification = ScenarioClassifier::classify(&snapshot).unwrap();
        let plan = AllocationPlanner::default()
            .plan(&snapshot, &classification, &overrides)
            .unwrap();

        prop_assert_eq!(plan.accounted_total(), classification.base_left_to_spend);

        // Every destination is non-negative.
        prop_assert!(!plan.recovery_contribution.is_negative());
        prop_assert!(!plan.app_savings_deposit.is_negative());
        prop_assert!(!plan.app_savings_withdrawal.is_negative());
        prop_assert!(!plan.recovery_debt_added.is_negative());
        prop_assert!(!plan.unallocated_surplus.is_negative());
        prop_assert!(!plan.uncovered_deficit.is_negative());

        // Bounded by what exists.
        prop_assert!(plan.recovery_contribution <= snapshot.existing_recovery_remaining());
        prop_assert!(plan.app_savings_withdrawal <= snapshot.app_savings_balance);
    }

    /// When a surplus is fully distributed or a deficit fully covered by the
    /// cushion, debt payment + savings + deposit - withdrawal is the base left-to-spend.
    #[test]
    fn prop_fully_covered_identity(
        snapshot in snapshot_strategy(),
        overrides in overrides_strategy(),
    ) {
        let classification = ScenarioClassifier::classify(&snapshot).unwrap();
        let plan = AllocationPlanner::default()
            .plan(&snapshot, &classification, &overrides)
            .unwrap();

        let fully_covered = plan.unallocated_surplus.is_zero()
            && plan.uncovered_deficit.is_zero()
            && plan.recovery_debt_added.is_zero();
        if fully_covered {
            prop_assert_eq!(
                plan.recovery_contribution
                    + plan.savings_contributions_total()
                    + plan.app_savings_deposit
                    - plan.app_savings_withdrawal,
                classification.base_left_to_spend
            );
        }
    }

    /// Automatic selection picks every goal or none.
    #[test]
    fn prop_all_or_nothing_selection(snapshot in snapshot_strategy()) {
        let classification = ScenarioClassifier::classify(&snapshot).unwrap();
        let plan = AllocationPlanner::default()
            .plan(&snapshot, &classification, &UserOverrides::default())
            .unwrap();

        let base_left = classification.base_left_to_spend;
        let remaining = snapshot.existing_recovery_remaining();
        let initial_recovery = if remaining.is_positive() {
            base_left.clamp_between(
                Money::ZERO,
                snapshot.recovery.weekly_contribution().min(remaining),
            )
        } else {
            Money::ZERO
        };
        let available = base_left - initial_recovery;
        let savings_total: Money = snapshot
            .savings_goals
            .iter()
            .map(SavingsGoalRef::capped_contribution)
            .sum();

        if base_left.is_positive() && savings_total <= available {
            prop_assert_eq!(plan.goal_contributions.len(), snapshot.savings_goals.len());
            for (contribution, goal) in plan.goal_contributions.iter().zip(&snapshot.savings_goals) {
                prop_assert!(contribution.amount <= goal.remaining);
            }
        } else {
            prop_assert!(plan.goal_contributions.is_empty());
        }
    }

    /// A deficit never auto-selects goals and never pays down the debt.
    #[test]
    fn prop_deficit_week_pays_nothing_out(snapshot in snapshot_strategy()) {
        let classification = ScenarioClassifier::classify(&snapshot).unwrap();
        prop_assume!(classification.has_deficit());

        let plan = AllocationPlanner::default()
            .plan(&snapshot, &classification, &UserOverrides::default())
            .unwrap();

        prop_assert_eq!(plan.mode, PlanMode::Deficit);
        prop_assert!(plan.goal_contributions.is_empty());
        prop_assert_eq!(plan.recovery_contribution, Money::ZERO);
        prop_assert_eq!(plan.app_savings_deposit, Money::ZERO);
    }
}
