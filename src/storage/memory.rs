//! In-memory record store

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{RecordStore, RegistrationRecord};

/// Record store kept in process memory. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<RegistrationRecord>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `records`.
    pub fn with_records(records: Vec<RegistrationRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn load(&self) -> Vec<RegistrationRecord> {
        self.records.read().await.clone()
    }

    async fn append(&self, record: RegistrationRecord) -> anyhow::Result<()> {
        self.records.write().await.push(record);
        Ok(())
    }
}
