//! Owner-checked lease removal.

use std::sync::Arc;

use tracing::debug;

use sessionlock_core::config::lock::ReleaseMode;
use sessionlock_core::result::AppResult;
use sessionlock_core::traits::lock_store::LockStore;

use crate::keys::LockKey;
use crate::token::LockToken;

/// Deletes a lease only while it still carries the caller's token.
///
/// A holder whose lease expired and was re-acquired by someone else must
/// never remove the new holder's lease. A mismatch is a silent no-op.
#[derive(Debug, Clone)]
pub struct ReleaseGuard {
    store: Arc<dyn LockStore>,
    mode: ReleaseMode,
}

impl ReleaseGuard {
    /// Create a guard over a store.
    pub fn new(store: Arc<dyn LockStore>, mode: ReleaseMode) -> Self {
        Self { store, mode }
    }

    /// Remove the lease at `key` if it holds `token`.
    ///
    /// Returns `true` if a lease was deleted. Store errors propagate.
    pub async fn release(&self, key: &LockKey, token: &LockToken) -> AppResult<bool> {
        let removed = match self.mode {
            ReleaseMode::GetThenDelete => self.get_then_delete(key, token).await?,
            ReleaseMode::CompareAndDelete => {
                self.store
                    .compare_and_delete(key.as_str(), token.as_str())
                    .await?
            }
        };

        if !removed {
            debug!(key = %key, mode = %self.mode, "Lease absent or owned by another token, nothing released");
        }
        Ok(removed)
    }

    /// Read, compare, then delete. Not atomic: the lease can change hands
    /// between the two calls if it expires in that window.
    async fn get_then_delete(&self, key: &LockKey, token: &LockToken) -> AppResult<bool> {
        match self.store.get(key.as_str()).await? {
            Some(current) if current == token.as_str() => {
                let removed = self.store.delete(key.as_str()).await?;
                Ok(removed > 0)
            }
            _ => Ok(false),
        }
    }
}
