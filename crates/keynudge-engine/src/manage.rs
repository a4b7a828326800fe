//! Management surface over the learned ledger: list, forget one, clear all.

use crate::ledger::{LearnedEntry, LearnedLedger, LedgerError};
use async_trait::async_trait;
use keynudge_common::ShortcutIdentity;
use std::sync::Arc;

/// Asked before the irreversible clear.
#[async_trait]
pub trait ClearConfirmation: Send + Sync {
    async fn confirm_clear(&self, count: usize) -> bool;
}

/// Confirms without asking. For `--yes` style flags.
pub struct AlwaysConfirm;

#[async_trait]
impl ClearConfirmation for AlwaysConfirm {
    async fn confirm_clear(&self, _count: usize) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared { removed: usize },
    Cancelled,
    /// Nothing was learned, so nothing was asked.
    AlreadyEmpty,
}

pub struct LearnedManager {
    ledger: Arc<LearnedLedger>,
}

impl LearnedManager {
    pub fn new(ledger: Arc<LearnedLedger>) -> Self {
        Self { ledger }
    }

    pub fn list(&self) -> Vec<LearnedEntry> {
        self.ledger.detailed_learned()
    }

    /// Returns whether the shortcut had been learned.
    pub async fn unlearn(&self, keys: &str, action: &str) -> Result<bool, LedgerError> {
        let identity = ShortcutIdentity::new(keys, action);
        let was_learned = self.ledger.is_learned(&identity);
        self.ledger.unlearn(&identity).await?;
        Ok(was_learned)
    }

    pub async fn clear_all(
        &self,
        confirmation: &dyn ClearConfirmation,
    ) -> Result<ClearOutcome, LedgerError> {
        let count = self.ledger.len();
        if count == 0 {
            return Ok(ClearOutcome::AlreadyEmpty);
        }
        if !confirmation.confirm_clear(count).await {
            return Ok(ClearOutcome::Cancelled);
        }
        self.ledger.clear_all().await?;
        Ok(ClearOutcome::Cleared { removed: count })
    }
}
