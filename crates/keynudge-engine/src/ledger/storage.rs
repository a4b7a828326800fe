use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::fs;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Durable slot holding the encoded learned identities.
///
/// `save` replaces the whole slot.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn load(&self) -> Result<Vec<String>, StorageError>;

    async fn save(&self, entries: &[String]) -> Result<(), StorageError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerFile {
    #[serde(default)]
    learned_shortcuts: Vec<String>,
}

/// Stores the slot as a YAML file.
pub struct YamlLedgerStore {
    path: PathBuf,
}

impl YamlLedgerStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl LedgerStore for YamlLedgerStore {
    async fn load(&self) -> Result<Vec<String>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let file: LedgerFile = serde_yaml::from_str(&content)?;
        Ok(file.learned_shortcuts)
    }

    async fn save(&self, entries: &[String]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await?;
        }

        let yaml = serde_yaml::to_string(&LedgerFile {
            learned_shortcuts: entries.to_vec(),
        })?;

        // Write next to the target and rename so a crash never leaves half a file.
        let tmp = self.path.with_extension("yaml.tmp");
        fs::write(&tmp, yaml).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// In-memory slot. Clones share the same slot, which lets tests simulate a
/// restart by building a second ledger over a clone.
#[derive(Clone, Default)]
pub struct MemoryLedgerStore {
    slot: Arc<Mutex<Vec<String>>>,
    fail_writes: Arc<Mutex<bool>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<String>) -> Self {
        let store = Self::default();
        *store.slot.lock().unwrap_or_else(PoisonError::into_inner) = entries;
        store
    }

    /// Make every subsequent `save` fail until switched back.
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap_or_else(PoisonError::into_inner) = fail;
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn load(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.snapshot())
    }

    async fn save(&self, entries: &[String]) -> Result<(), StorageError> {
        if *self.fail_writes.lock().unwrap_or_else(PoisonError::into_inner) {
            return Err(StorageError::Unavailable("writes disabled".into()));
        }
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = entries.to_vec();
        Ok(())
    }
}
