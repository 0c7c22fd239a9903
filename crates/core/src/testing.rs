//! In-process fakes for the store traits, with per-call fault injection.

use std::collections::HashMap;
use std::sync::Mutex;

use weekclose_shared::{GoalId, Money, StoreError, StoreResult};

use crate::ports::{
    GoalStore, LedgerEntry, ReportStore, SavingsBalanceStore, TransactionLedger,
};
use crate::recovery::RecoveryDebt;
use crate::report::WeekReport;
use crate::snapshot::SavingsGoalRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Op {
    ListGoals,
    ListDebt,
    AddContribution,
    UpsertDebt,
    GetBalance,
    Deposit,
    Withdraw,
    InsertLedger,
    UpsertReport,
    RecentReports,
}

#[derive(Default)]
pub(crate) struct FakeState {
    pub goals: Vec<SavingsGoalRef>,
    pub debt: Option<RecoveryDebt>,
    pub balance: Money,
    /// Balance the cushion drops to right before a withdrawal, simulating a concurrent writer.
    pub balance_before_withdraw: Option<Money>,
    pub ledger: Vec<LedgerEntry>,
    pub reports: Vec<WeekReport>,
    pub calls: Vec<Op>,
    pub faults: HashMap<Op, StoreError>,
}

/// One object standing in for all four stores.
#[derive(Default)]
pub(crate) struct FakeStores {
    state: Mutex<FakeState>,
}

impl FakeStores {
    pub fn new(goals: Vec<SavingsGoalRef>, debt: Option<RecoveryDebt>, balance: Money) -> Self {
        Self {
            state: Mutex::new(FakeState {
                goals,
                debt,
                balance,
                ..FakeState::default()
            }),
        }
    }

    pub fn fail(&self, op: Op, error: StoreError) {
        self.state.lock().unwrap().faults.insert(op, error);
    }

    pub fn with<T>(&self, f: impl FnOnce(&mut FakeState) -> T) -> T {
        f(&mut self.state.lock().unwrap())
    }

    fn enter(&self, op: Op) -> StoreResult<std::sync::MutexGuard<'_, FakeState>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(op);
        match state.faults.get(&op) {
            Some(error) => Err(error.clone()),
            None => Ok(state),
        }
    }
}

impl GoalStore for FakeStores {
    async fn list_active_savings_goals(&self) -> StoreResult<Vec<SavingsGoalRef>> {
        Ok(self.enter(Op::ListGoals)?.goals.clone())
    }

    async fn list_active_recovery_debt(&self) -> StoreResult<Option<RecoveryDebt>> {
        Ok(self.enter(Op::ListDebt)?.debt.clone())
    }

    async fn add_contribution(&self, goal_id: GoalId, amount: Money) -> StoreResult<Money> {
        let mut state = self.enter(Op::AddContribution)?;
        if let Some(debt) = state.debt.as_mut().filter(|d| d.id == goal_id) {
            return Ok(debt.apply_payment(amount));
        }
        let goal = state
            .goals
            .iter_mut()
            .find(|g| g.id == goal_id)
            .ok_or_else(|| StoreError::NotFound(goal_id.to_string()))?;
        let applied = amount.min(goal.remaining);
        goal.remaining -= applied;
        Ok(applied)
    }

    async fn upsert_recovery_debt(&self, debt: RecoveryDebt) -> StoreResult<()> {
        self.enter(Op::UpsertDebt)?.debt = Some(debt);
        Ok(())
    }
}

impl SavingsBalanceStore for FakeStores {
    async fn get_balance(&self) -> StoreResult<Money> {
        Ok(self.enter(Op::GetBalance)?.balance)
    }

    async fn add(&self, amount: Money) -> StoreResult<Money> {
        let mut state = self.enter(Op::Deposit)?;
        state.balance += amount;
        Ok(state.balance)
    }

    async fn withdraw(&self, amount: Money) -> StoreResult<Money> {
        let mut state = self.enter(Op::Withdraw)?;
        if let Some(raced) = state.balance_before_withdraw.take() {
            state.balance = raced;
        }
        let withdrawn = amount.min(state.balance);
        state.balance -= withdrawn;
        Ok(withdrawn)
    }
}

impl TransactionLedger for FakeStores {
    async fn insert(&self, entry: LedgerEntry) -> StoreResult<()> {
        self.enter(Op::InsertLedger)?.ledger.push(entry);
        Ok(())
    }
}

impl ReportStore for FakeStores {
    async fn upsert(&self, report: WeekReport) -> StoreResult<()> {
        let mut state = self.enter(Op::UpsertReport)?;
        state.reports.retain(|r| r.week_end != report.week_end);
        state.reports.push(report);
        Ok(())
    }

    async fn recent(&self, limit: usize) -> StoreResult<Vec<WeekReport>> {
        let mut reports = self.enter(Op::RecentReports)?.reports.clone();
        reports.sort_by(|a, b| b.week_end.cmp(&a.week_end));
        reports.truncate(limit);
        Ok(reports)
    }
}
