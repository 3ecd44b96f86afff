//! In-memory lock store backed by a sharded concurrent map.
//!
//! Expiry is tracked with [`tokio::time::Instant`], so a paused Tokio clock
//! (`#[tokio::test(start_paused = true)]`) drives lease expiry in tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::time::Instant;
use tracing::debug;

use sessionlock_core::config::store::MemoryStoreConfig;
use sessionlock_core::error::AppError;
use sessionlock_core::result::AppResult;
use sessionlock_core::traits::lock_store::LockStore;

/// Expiry used when `now + ttl` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

/// A stored value and the instant it stops being visible.
#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    expires_at: Instant,
}

impl StoredValue {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// In-memory lock store.
///
/// All operations on a single key run under that key's shard lock, which
/// makes `set_nx` and `compare_and_delete` atomic within one process.
#[derive(Debug, Clone)]
pub struct MemoryLockStore {
    entries: Arc<DashMap<String, StoredValue>>,
    max_entries: usize,
}

impl MemoryLockStore {
    /// Create a new in-memory store from configuration.
    pub fn new(config: &MemoryStoreConfig) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            max_entries: config.max_entries,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.iter().filter(|e| e.is_live(now)).count()
    }

    /// Whether the store holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired entry.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, v| v.is_live(now));
        let purged = before.saturating_sub(self.entries.len());
        if purged > 0 {
            debug!(purged, "Purged expired entries");
        }
        purged
    }

    fn ensure_capacity(&self) -> AppResult<()> {
        if self.entries.len() < self.max_entries {
            return Ok(());
        }
        self.purge_expired();
        if self.entries.len() >= self.max_entries {
            return Err(AppError::service_unavailable(format!(
                "In-memory store is full ({} entries)",
                self.max_entries
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl LockStore for MemoryLockStore {
    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool> {
        let now = Instant::now();
        if !self.entries.contains_key(key) {
            self.ensure_capacity()?;
        }

        let stored = StoredValue {
            value: value.to_string(),
            expires_at: now.checked_add(ttl).unwrap_or_else(|| now + FAR_FUTURE),
        };

        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_live(now) {
                    return Ok(false);
                }
                occupied.insert(stored);
                Ok(true)
            }
            Entry::Vacant(vacant) => {
                vacant.insert(stored);
                Ok(true)
            }
        }
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let now = Instant::now();
        let value = self
            .entries
            .get(key)
            .filter(|e| e.is_live(now))
            .map(|e| e.value.clone());
        if value.is_none() {
            self.entries.remove_if(key, |_, v| !v.is_live(now));
        }
        Ok(value)
    }

    async fn delete(&self, key: &str) -> AppResult<u64> {
        let now = Instant::now();
        match self.entries.remove(key) {
            Some((_, v)) if v.is_live(now) => Ok(1),
            _ => Ok(0),
        }
    }

    async fn compare_and_delete(&self, key: &str, expected: &str) -> AppResult<bool> {
        let now = Instant::now();
        let removed = self
            .entries
            .remove_if(key, |_, v| v.is_live(now) && v.value == expected);
        Ok(removed.is_some())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
