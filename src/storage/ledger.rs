//! Registration ledger
//!
//! Wraps a [`RecordStore`] with the uniqueness rule: at most one record per
//! address, compared ignoring ASCII case. The check and the append run under
//! one mutex so concurrent registrations in this process cannot both pass the
//! duplicate check.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use super::{RecordStore, RegistrationRecord};

/// Result of [`RegistrationLedger::insert_if_absent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The record was appended
    Inserted,
    /// A record for the same address already exists; nothing was written
    AlreadyRegistered(RegistrationRecord),
}

/// Uniqueness-enforcing front of a record store.
pub struct RegistrationLedger {
    store: Arc<dyn RecordStore>,
    write_lock: Mutex<()>,
}

impl RegistrationLedger {
    /// Creates a ledger over `store`.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Appends `record` unless its address is already registered.
    ///
    /// # Returns
    ///
    /// * `Ok(InsertOutcome)` - Whether the record was inserted
    /// * `Err(anyhow::Error)` - The store failed to write
    pub async fn insert_if_absent(&self, record: RegistrationRecord) -> anyhow::Result<InsertOutcome> {
        let _guard = self.write_lock.lock().await;

        if let Some(existing) = self.find_unlocked(&record.address).await {
            return Ok(InsertOutcome::AlreadyRegistered(existing));
        }

        let address = record.address.clone();
        self.store.append(record).await?;
        info!("Registered wallet address {}", address);
        Ok(InsertOutcome::Inserted)
    }

    /// Looks up the record for `address`, ignoring ASCII case.
    pub async fn find(&self, address: &str) -> Option<RegistrationRecord> {
        let _guard = self.write_lock.lock().await;
        self.find_unlocked(address).await
    }

    /// Returns every record in insertion order.
    pub async fn records(&self) -> Vec<RegistrationRecord> {
        self.store.load().await
    }

    async fn find_unlocked(&self, address: &str) -> Option<RegistrationRecord> {
        self.store
            .load()
            .await
            .into_iter()
            .find(|existing| existing.matches_address(address))
    }
}
