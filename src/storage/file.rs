//! JSON file record store
//!
//! The whole record list lives in one file as a pretty-printed JSON array. Every
//! append reads the full list, pushes the new record, and overwrites the file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{RecordStore, RegistrationRecord};

/// File-backed record store.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store for `path` without touching the file system.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store for `path`, creating its parent directory if needed.
    ///
    /// The file itself is created on the first append.
    pub async fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create data directory {}", parent.display()))?;
        }
        info!("Using registration store at {}", path.display());
        Ok(Self::new(path))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn load(&self) -> Vec<RegistrationRecord> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Store file {} does not exist yet", self.path.display());
                return Vec::new();
            }
            Err(e) => {
                warn!(
                    "Failed to read store file {}, treating it as empty: {}",
                    self.path.display(),
                    e
                );
                return Vec::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    "Store file {} is not a valid record list, treating it as empty: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    async fn append(&self, record: RegistrationRecord) -> anyhow::Result<()> {
        let mut records = self.load().await;
        records.push(record);

        let content =
            serde_json::to_string_pretty(&records).context("Failed to encode registration records")?;
        tokio::fs::write(&self.path, content)
            .await
            .with_context(|| format!("Failed to write store file {}", self.path.display()))?;

        debug!("Store file {} now holds {} records", self.path.display(), records.len());
        Ok(())
    }
}
