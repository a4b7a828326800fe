//! The learned ledger: shortcuts the user acknowledged, persisted across runs.

pub mod storage;

use keynudge_common::{IdentityError, ShortcutIdentity};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};
use tokio::sync::Mutex;
use tracing::{info, warn};

pub use storage::{LedgerStore, MemoryLedgerStore, StorageError, YamlLedgerStore};

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Failed to persist learned shortcuts: {0}")]
    Storage(#[from] StorageError),
    #[error("Invalid shortcut identity: {0}")]
    InvalidIdentity(#[from] IdentityError),
}

/// A learned shortcut decomposed for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LearnedEntry {
    pub shortcut_keys: String,
    pub action_description: String,
}

impl From<&ShortcutIdentity> for LearnedEntry {
    fn from(identity: &ShortcutIdentity) -> Self {
        Self {
            shortcut_keys: identity.keys.clone(),
            action_description: identity.action.clone(),
        }
    }
}

pub struct LearnedLedger {
    store: Box<dyn LedgerStore>,
    /// Insertion ordered, without duplicates.
    entries: RwLock<Vec<ShortcutIdentity>>,
    /// Serializes mutations. Held across the persist call.
    write_lock: Mutex<()>,
}

impl LearnedLedger {
    /// Read the store once. Entries that fail to decode are skipped.
    pub async fn open(store: Box<dyn LedgerStore>) -> Result<Self, LedgerError> {
        let raw = store.load().await?;
        let mut entries: Vec<ShortcutIdentity> = Vec::with_capacity(raw.len());
        for encoded in raw {
            match ShortcutIdentity::decode(&encoded) {
                Ok(identity) if !entries.contains(&identity) => entries.push(identity),
                Ok(_) => {}
                Err(e) => warn!(entry = %encoded, error = %e, "Skipping malformed ledger entry"),
            }
        }

        Ok(Self {
            store,
            entries: RwLock::new(entries),
            write_lock: Mutex::new(()),
        })
    }

    pub fn is_learned(&self, identity: &ShortcutIdentity) -> bool {
        self.read().contains(identity)
    }

    pub async fn mark_learned(&self, identity: &ShortcutIdentity) -> Result<(), LedgerError> {
        // Reject before taking the lock so bad input never reaches the store.
        identity.encode()?;

        let _guard = self.write_lock.lock().await;
        let mut next = self.read().clone();
        if next.contains(identity) {
            return Ok(());
        }
        next.push(identity.clone());
        self.commit(next).await?;
        info!(shortcut = %identity, "Marked shortcut as learned");
        Ok(())
    }

    /// Removing an identity that is not learned is a no-op and does not touch
    /// the store.
    pub async fn unlearn(&self, identity: &ShortcutIdentity) -> Result<(), LedgerError> {
        let _guard = self.write_lock.lock().await;
        let current = self.read().clone();
        if !current.contains(identity) {
            return Ok(());
        }
        let next = current.into_iter().filter(|i| i != identity).collect();
        self.commit(next).await?;
        info!(shortcut = %identity, "Unlearned shortcut");
        Ok(())
    }

    pub async fn clear_all(&self) -> Result<(), LedgerError> {
        let _guard = self.write_lock.lock().await;
        let removed = self.read().len();
        self.commit(Vec::new()).await?;
        info!(removed, "Cleared learned shortcuts");
        Ok(())
    }

    pub fn all_learned(&self) -> HashSet<ShortcutIdentity> {
        self.read().iter().cloned().collect()
    }

    pub fn detailed_learned(&self) -> Vec<LearnedEntry> {
        self.read().iter().map(LearnedEntry::from).collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Persist `next`, then make it visible. On failure memory is unchanged.
    async fn commit(&self, next: Vec<ShortcutIdentity>) -> Result<(), LedgerError> {
        let encoded = next
            .iter()
            .map(ShortcutIdentity::encode)
            .collect::<Result<Vec<_>, _>>()?;

        if let Err(e) = self.store.save(&encoded).await {
            warn!(error = %e, "Ledger persist failed");
            return Err(e.into());
        }

        *self.entries.write().unwrap_or_else(PoisonError::into_inner) = next;
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<ShortcutIdentity>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }
}
