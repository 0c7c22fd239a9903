//! In-memory goal store.

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::debug;
use weekclose_core::ports::GoalStore;
use weekclose_core::{RecoveryDebt, SavingsGoalRef};
use weekclose_shared::{GoalId, Money, StoreError, StoreResult};

/// Savings goals plus the single recovery debt.
///
/// Savings goals are locked per entry; the recovery debt sits behind one
/// async mutex so at most one record ever exists.
#[derive(Debug, Default)]
pub struct MemoryGoalStore {
    savings: DashMap<GoalId, SavingsGoalRef>,
    recovery: Mutex<Option<RecoveryDebt>>,
}

impl MemoryGoalStore {
    /// Creates a store seeded with goals and an optional debt.
    #[must_use]
    pub fn new(goals: Vec<SavingsGoalRef>, recovery: Option<RecoveryDebt>) -> Self {
        Self {
            savings: goals.into_iter().map(|goal| (goal.id, goal)).collect(),
            recovery: Mutex::new(recovery),
        }
    }

    /// Adds or replaces a savings goal.
    pub fn insert_savings_goal(&self, goal: SavingsGoalRef) {
        self.savings.insert(goal.id, goal);
    }

    /// A savings goal by ID, active or not.
    #[must_use]
    pub fn savings_goal(&self, id: GoalId) -> Option<SavingsGoalRef> {
        self.savings.get(&id).map(|entry| entry.value().clone())
    }

    /// The recovery debt record, settled or not.
    pub async fn recovery_debt(&self) -> Option<RecoveryDebt> {
        self.recovery.lock().await.clone()
    }
}

impl GoalStore for MemoryGoalStore {
    async fn list_active_savings_goals(&self) -> StoreResult<Vec<SavingsGoalRef>> {
        let mut goals: Vec<SavingsGoalRef> = self
            .savings
            .iter()
            .filter(|entry| entry.remaining.is_positive())
            .map(|entry| entry.value().clone())
            .collect();
        goals.sort_by_key(|goal| goal.id);
        Ok(goals)
    }

    async fn list_active_recovery_debt(&self) -> StoreResult<Option<RecoveryDebt>> {
        Ok(self.recovery.lock().await.clone())
    }

    async fn add_contribution(&self, goal_id: GoalId, amount: Money) -> StoreResult<Money> {
        if amount.is_negative() {
            return Err(StoreError::Rejected(format!(
                "negative contribution of {amount} to {goal_id}"
            )));
        }

        {
            let mut recovery = self.recovery.lock().await;
            if let Some(debt) = recovery.as_mut().filter(|debt| debt.id == goal_id) {
                let applied = debt.apply_payment(amount);
                debug!(goal_id = %goal_id, applied = %applied, remaining = %debt.remaining(), "Recovery payment applied");
                return Ok(applied);
            }
        }

        let mut goal = self
            .savings
            .get_mut(&goal_id)
            .ok_or_else(|| StoreError::NotFound(format!("savings goal {goal_id}")))?;
        let applied = amount.min(goal.remaining);
        goal.remaining -= applied;
        debug!(goal_id = %goal_id, applied = %applied, remaining = %goal.remaining, "Goal contribution applied");
        Ok(applied)
    }

    async fn upsert_recovery_debt(&self, debt: RecoveryDebt) -> StoreResult<()> {
        let mut recovery = self.recovery.lock().await;
        if let Some(current) = recovery.as_ref()
            && current.id != debt.id
            && !current.is_settled()
        {
            return Err(StoreError::Rejected(format!(
                "recovery debt {} is still active",
                current.id
            )));
        }
        debug!(goal_id = %debt.id, remaining = %debt.remaining(), "Recovery debt upserted");
        *recovery = Some(debt);
        Ok(())
    }
}
