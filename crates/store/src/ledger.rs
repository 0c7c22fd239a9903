//! In-memory transaction ledger.

use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::debug;
use weekclose_core::ports::{LedgerEntry, TransactionLedger};
use weekclose_shared::{Money, StoreError, StoreResult};

/// Append-only list of ledger entries.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    entries: RwLock<Vec<LedgerEntry>>,
}

impl MemoryLedger {
    /// All entries in insertion order.
    pub async fn entries(&self) -> Vec<LedgerEntry> {
        self.entries.read().await.clone()
    }

    /// Sum of the entries dated `date`.
    pub async fn total_on(&self, date: NaiveDate) -> Money {
        self.entries
            .read()
            .await
            .iter()
            .filter(|entry| entry.date == date)
            .map(|entry| entry.amount)
            .sum()
    }
}

impl TransactionLedger for MemoryLedger {
    async fn insert(&self, entry: LedgerEntry) -> StoreResult<()> {
        let mut entries = self.entries.write().await;
        if entries.iter().any(|existing| existing.id == entry.id) {
            return Err(StoreError::Rejected(format!(
                "duplicate ledger entry {}",
                entry.id
            )));
        }
        debug!(category = %entry.category, amount = %entry.amount, date = %entry.date, "Ledger entry");
        entries.push(entry);
        Ok(())
    }
}
