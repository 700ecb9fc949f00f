//! Storage Module
//!
//! This module provides the record store for wallet registrations. Stores sit
//! behind the [`RecordStore`] trait so the registration flow can run against a
//! JSON file in production and an in-memory list in tests.

pub mod file;
pub mod ledger;
pub mod memory;
pub mod records;

use async_trait::async_trait;

// Re-export for convenience
pub use file::JsonFileStore;
pub use ledger::{InsertOutcome, RegistrationLedger};
pub use memory::MemoryStore;
pub use records::{current_timestamp_ms, RegistrationRecord, WalletType};

/// Persistence contract for registration records.
///
/// `load` never fails: a store that cannot be read is reported as empty.
/// `append` adds one record at the end; it performs no duplicate check, which is
/// the job of [`RegistrationLedger`].
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns every stored record in insertion order.
    async fn load(&self) -> Vec<RegistrationRecord>;

    /// Appends a record to the end of the store.
    async fn append(&self, record: RegistrationRecord) -> anyhow::Result<()>;
}
