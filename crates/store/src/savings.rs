//! In-memory savings cushion.

use tokio::sync::Mutex;
use tracing::debug;
use weekclose_core::ports::SavingsBalanceStore;
use weekclose_shared::{Money, StoreError, StoreResult};

/// A single running balance behind an async mutex.
#[derive(Debug, Default)]
pub struct MemorySavingsStore {
    balance: Mutex<Money>,
}

impl MemorySavingsStore {
    /// Creates a cushion with an opening balance.
    #[must_use]
    pub fn new(balance: Money) -> Self {
        Self {
            balance: Mutex::new(balance),
        }
    }
}

fn reject_negative(amount: Money) -> StoreResult<()> {
    if amount.is_negative() {
        return Err(StoreError::Rejected(format!("negative amount {amount}")));
    }
    Ok(())
}

impl SavingsBalanceStore for MemorySavingsStore {
    async fn get_balance(&self) -> StoreResult<Money> {
        Ok(*self.balance.lock().await)
    }

    async fn add(&self, amount: Money) -> StoreResult<Money> {
        reject_negative(amount)?;
        let mut balance = self.balance.lock().await;
        *balance += amount;
        debug!(amount = %amount, balance = %*balance, "Savings deposit");
        Ok(*balance)
    }

    async fn withdraw(&self, amount: Money) -> StoreResult<Money> {
        reject_negative(amount)?;
        let mut balance = self.balance.lock().await;
        let withdrawn = amount.min(*balance);
        *balance -= withdrawn;
        debug!(requested = %amount, withdrawn = %withdrawn, balance = %*balance, "Savings withdrawal");
        Ok(withdrawn)
    }
}
