//! Tests for the reconciliation committer.

use std::sync::Arc;

use chrono::NaiveDate;
use weekclose_shared::{GoalId, Money, StoreError};

use super::{CommitStage, CommitStep, ReconciliationCommitter, planned_steps};
use crate::classify::ScenarioClassifier;
use crate::error::ReconcileError;
use crate::planner::{AllocationPlan, AllocationPlanner, UserOverrides};
use crate::ports::LedgerCategory;
use crate::recovery::{AmortizationWeeks, RecoveryDebt, RecoveryState};
use crate::snapshot::{SavingsGoalRef, WeekFigures, WeekSnapshot};
use crate::testing::{FakeStores, Op};

type Committer = ReconciliationCommitter<FakeStores, FakeStores, FakeStores, FakeStores>;

fn week_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

fn figures(income: i64, budgeted: i64, spent: i64, discretionary: i64) -> WeekFigures {
    WeekFigures {
        income: Money::from_units(income),
        total_budgeted: Money::from_units(budgeted),
        spent_on_budgets: Money::from_units(spent),
        discretionary_spent: Money::from_units(discretionary),
    }
}

fn goal(name: &str, default_weekly: i64) -> SavingsGoalRef {
    SavingsGoalRef {
        id: GoalId::new(),
        name: name.to_string(),
        remaining: Money::from_units(1_000),
        default_weekly_contribution: Money::from_units(default_weekly),
    }
}

fn debt(total: i64, saved: i64, weekly: i64) -> RecoveryDebt {
    RecoveryDebt {
        id: GoalId::new(),
        total_amount: Money::from_units(total),
        saved_amount: Money::from_units(saved),
        weekly_contribution: Money::from_units(weekly),
        amortization_weeks: AmortizationWeeks::new(4).unwrap(),
        original_deficit: Money::from_units(total),
    }
}

/// Builds stores and a plan over the same state.
fn setup(
    figures: WeekFigures,
    goals: Vec<SavingsGoalRef>,
    existing: Option<RecoveryDebt>,
    balance: i64,
    overrides: &UserOverrides,
) -> (Arc<FakeStores>, Committer, AllocationPlan) {
    let stores = Arc::new(FakeStores::new(
        goals.clone(),
        existing.clone(),
        Money::from_units(balance),
    ));
    let committer = ReconciliationCommitter::new(
        Arc::clone(&stores),
        Arc::clone(&stores),
        Arc::clone(&stores),
        Arc::clone(&stores),
    );

    let snapshot = WeekSnapshot::new(
        figures,
        RecoveryState::from_record(existing),
        Money::from_units(balance),
        goals,
    )
    .unwrap();
    let classification = ScenarioClassifier::classify(&snapshot).unwrap();
    let plan = AllocationPlanner::default()
        .plan(&snapshot, &classification, overrides)
        .unwrap();

    (stores, committer, plan)
}

#[tokio::test]
async fn test_surplus_week_commits_every_step() {
    let existing = debt(200, 50, 50);
    let debt_id = existing.id;
    let overrides = UserOverrides {
        deposit_surplus_to_app_savings: true,
        ..UserOverrides::default()
    };
    let (stores, committer, plan) = setup(
        figures(1_000, 500, 500, 250),
        vec![goal("holiday", 30), goal("laptop", 20)],
        Some(existing),
        10,
        &overrides,
    );

    let result = committer.commit(&plan, week_end()).await;

    assert!(result.is_complete());
    assert!(result.money_moved());
    assert_eq!(result.uncovered_deficit, Money::ZERO);
    assert!(matches!(
        result.completed.last(),
        Some(CommitStep::ReportSaved { .. })
    ));

    stores.with(|state| {
        let debt = state.debt.as_ref().unwrap();
        assert_eq!(debt.id, debt_id);
        assert!(debt.is_settled());
        assert_eq!(state.balance, Money::from_units(60));

        assert_eq!(state.ledger.len(), 3);
        assert!(state.ledger.iter().all(|e| e.date == week_end()));
        let recovery_entries: Vec<_> = state
            .ledger
            .iter()
            .filter(|e| e.category == LedgerCategory::RecoveryPayment)
            .collect();
        assert_eq!(recovery_entries.len(), 1);
        assert_eq!(recovery_entries[0].amount, Money::from_units(150));

        let report = &state.reports[0];
        assert_eq!(report.week_end, week_end());
        assert_eq!(report.savings_contributed, Money::from_units(50));
        assert_eq!(report.recovery_paid, Money::from_units(150));
        assert_eq!(report.app_savings_change, Money::from_units(50));
    });
}

#[tokio::test]
async fn test_deficit_week_withdraws_then_creates_debt() {
    let (stores, committer, plan) = setup(
        figures(500, 500, 500, 300),
        Vec::new(),
        None,
        100,
        &UserOverrides::default(),
    );

    let result = committer.commit(&plan, week_end()).await;

    assert!(result.is_complete());
    assert_eq!(result.summary(), "savings withdrawn, recovery goal updated, weekly report saved");
    stores.with(|state| {
        assert_eq!(state.balance, Money::ZERO);
        let debt = state.debt.as_ref().unwrap();
        assert_eq!(debt.total_amount, Money::from_units(200));
        assert_eq!(debt.weekly_contribution, Money::from_units(50));
        assert!(state.ledger.is_empty());
        assert_eq!(state.reports[0].recovery_debt_added, Money::from_units(200));
        assert_eq!(state.reports[0].app_savings_change, Money::from_units(-100));
    });
}

#[tokio::test]
async fn test_extends_existing_debt_instead_of_duplicating() {
    let existing = debt(200, 50, 50);
    let debt_id = existing.id;
    let overrides = UserOverrides {
        amortization_weeks: Some(3),
        ..UserOverrides::default()
    };
    let (stores, committer, plan) = setup(
        figures(500, 500, 500, 60),
        Vec::new(),
        Some(existing),
        0,
        &overrides,
    );

    let result = committer.commit(&plan, week_end()).await;

    assert!(result.is_complete());
    stores.with(|state| {
        let debt = state.debt.as_ref().unwrap();
        assert_eq!(debt.id, debt_id);
        assert_eq!(debt.total_amount, Money::from_units(260));
        assert_eq!(debt.weekly_contribution, Money::from_units(70));
    });
}

#[tokio::test]
async fn test_withdrawal_shortfall_is_added_to_debt() {
    let (stores, committer, plan) = setup(
        figures(500, 500, 500, 300),
        Vec::new(),
        None,
        100,
        &UserOverrides::default(),
    );
    stores.with(|state| state.balance_before_withdraw = Some(Money::from_units(40)));

    let result = committer.commit(&plan, week_end()).await;

    assert!(result.is_complete());
    assert_eq!(result.uncovered_deficit, Money::ZERO);
    assert!(result.completed.contains(&CommitStep::SavingsWithdrawal {
        requested: Money::from_units(100),
        withdrawn: Money::from_units(40),
    }));
    stores.with(|state| {
        assert_eq!(
            state.debt.as_ref().unwrap().total_amount,
            Money::from_units(260)
        );
    });
}

#[tokio::test]
async fn test_withdrawal_shortfall_without_recovery_is_uncovered() {
    let overrides = UserOverrides {
        create_or_add_to_recovery: false,
        ..UserOverrides::default()
    };
    let (stores, committer, plan) = setup(
        figures(500, 500, 500, 300),
        Vec::new(),
        None,
        100,
        &overrides,
    );
    assert_eq!(plan.uncovered_deficit, Money::from_units(200));
    stores.with(|state| state.balance_before_withdraw = Some(Money::from_units(40)));

    let result = committer.commit(&plan, week_end()).await;

    assert!(result.is_complete());
    assert_eq!(result.uncovered_deficit, Money::from_units(260));
    stores.with(|state| {
        assert!(state.debt.is_none());
        assert!(!state.calls.contains(&Op::UpsertDebt));
    });
}

#[tokio::test]
async fn test_nearly_complete_goal_leaves_rest_for_debt() {
    let nearly_done = SavingsGoalRef {
        remaining: Money::from_units(5),
        ..goal("nearly done", 20)
    };
    let goal_id = nearly_done.id;
    let (stores, committer, plan) = setup(
        figures(550, 500, 500, 0),
        vec![nearly_done],
        Some(debt(100, 0, 30)),
        0,
        &UserOverrides::default(),
    );

    assert_eq!(plan.savings_contributions_total(), Money::from_units(5));
    assert_eq!(plan.recovery_contribution, Money::from_units(45));
    assert_eq!(plan.unallocated_surplus, Money::ZERO);
    assert!(plan.is_conserved());

    let result = committer.commit(&plan, week_end()).await;

    assert!(result.is_complete());
    assert_eq!(result.unapplied_contributions, Money::ZERO);
    stores.with(|state| {
        let goal = state.goals.iter().find(|g| g.id == goal_id).unwrap();
        assert_eq!(goal.remaining, Money::ZERO);
        assert_eq!(state.debt.as_ref().unwrap().remaining(), Money::from_units(55));

        let report = &state.reports[0];
        assert_eq!(report.savings_contributed, Money::from_units(5));
        assert_eq!(report.recovery_paid, Money::from_units(45));
    });
}

#[tokio::test]
async fn test_contribution_the_store_declines_is_reported() {
    let (stores, committer, plan) = setup(
        figures(800, 500, 500, 250),
        vec![goal("holiday", 30)],
        None,
        0,
        &UserOverrides::default(),
    );
    assert_eq!(plan.savings_contributions_total(), Money::from_units(30));
    assert_eq!(plan.unallocated_surplus, Money::from_units(20));
    // The goal was topped up elsewhere after the plan was built.
    stores.with(|state| state.goals[0].remaining = Money::from_units(10));

    let result = committer.commit(&plan, week_end()).await;

    assert!(result.is_complete());
    assert_eq!(result.unapplied_contributions, Money::from_units(20));
    assert!(result.completed.contains(&CommitStep::GoalContribution {
        goal_id: plan.goal_contributions[0].goal_id,
        requested: Money::from_units(30),
        applied: Money::from_units(10),
    }));
    stores.with(|state| {
        assert_eq!(state.ledger.len(), 1);
        assert_eq!(state.ledger[0].amount, Money::from_units(10));
        assert_eq!(state.reports[0].savings_contributed, Money::from_units(10));
    });
}

#[tokio::test]
async fn test_failure_after_withdrawal_reports_partial_success() {
    let (stores, committer, plan) = setup(
        figures(500, 500, 500, 300),
        Vec::new(),
        None,
        100,
        &UserOverrides::default(),
    );
    stores.fail(Op::UpsertDebt, StoreError::Timeout("goal store".into()));

    let result = committer.commit(&plan, week_end()).await;

    assert!(!result.is_complete());
    assert!(result.money_moved());
    assert_eq!(
        result.summary(),
        "savings withdrawn, but recovery goal update failed"
    );
    assert_eq!(
        result.error(),
        Some(ReconcileError::StoreWriteFailed {
            stage: CommitStage::RecoveryDebt,
            source: StoreError::Timeout("goal store".into()),
        })
    );
    stores.with(|state| {
        assert_eq!(state.balance, Money::ZERO);
        assert!(state.debt.is_none());
        assert!(!state.calls.contains(&Op::UpsertReport));
    });
}

#[tokio::test]
async fn test_first_step_failure_moves_nothing() {
    let (stores, committer, plan) = setup(
        figures(800, 500, 500, 250),
        vec![goal("holiday", 50)],
        None,
        0,
        &UserOverrides::default(),
    );
    stores.fail(Op::AddContribution, StoreError::Unavailable("goal store".into()));

    let result = committer.commit(&plan, week_end()).await;

    assert!(!result.money_moved());
    assert!(result.completed.is_empty());
    assert_eq!(
        result.summary(),
        "savings goal contribution failed, nothing was changed"
    );
    stores.with(|state| assert!(state.ledger.is_empty() && state.reports.is_empty()));
}

#[tokio::test]
async fn test_ledger_failure_after_contribution_keeps_contribution() {
    let (stores, committer, plan) = setup(
        figures(800, 500, 500, 250),
        vec![goal("holiday", 50)],
        None,
        0,
        &UserOverrides::default(),
    );
    stores.fail(Op::InsertLedger, StoreError::Rejected("ledger".into()));

    let result = committer.commit(&plan, week_end()).await;

    assert_eq!(
        result.failure.as_ref().map(|f| f.stage),
        Some(CommitStage::GoalLedgerEntry)
    );
    assert_eq!(
        result.summary(),
        "savings goals funded, but goal contribution ledger entry failed"
    );
    stores.with(|state| {
        assert_eq!(state.goals[0].remaining, Money::from_units(950));
    });
}

#[tokio::test]
async fn test_balanced_week_only_saves_report() {
    let (stores, committer, plan) = setup(
        figures(500, 500, 500, 0),
        Vec::new(),
        None,
        0,
        &UserOverrides::default(),
    );

    let result = committer.commit(&plan, week_end()).await;

    assert!(result.is_complete());
    assert!(!result.money_moved());
    assert_eq!(result.completed, vec![CommitStep::ReportSaved { week_end: week_end() }]);
    stores.with(|state| assert_eq!(state.calls, vec![Op::UpsertReport]));
}

#[test]
fn test_planned_steps_follow_commit_order() {
    let (_stores, _committer, plan) = setup(
        figures(500, 500, 500, 300),
        Vec::new(),
        None,
        100,
        &UserOverrides::default(),
    );

    let stages: Vec<CommitStage> = planned_steps(&plan).iter().map(|s| s.stage).collect();

    assert_eq!(
        stages,
        vec![
            CommitStage::SavingsWithdrawal,
            CommitStage::RecoveryDebt,
            CommitStage::Report
        ]
    );
}
