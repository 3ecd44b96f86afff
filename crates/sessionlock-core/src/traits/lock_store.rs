//! Store-client trait for the shared key-value store backing session locks.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Strict adapter over the shared store.
///
/// Implementations translate whatever the backend returns (Redis `OK`/nil
/// replies, integer counts) into plain booleans and options, so the lock
/// logic never branches on backend-specific values. Any failure to reach the
/// store is returned as an error and must not be reported as a negative
/// answer.
#[async_trait]
pub trait LockStore: Send + Sync + std::fmt::Debug + 'static {
    /// Write `value` at `key` with the given expiry, only if `key` has no
    /// live value. Returns `true` if the value was written.
    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool>;

    /// Get the live value at `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Delete `key`. Returns the number of keys removed.
    async fn delete(&self, key: &str) -> AppResult<u64>;

    /// Atomically delete `key` only if its live value equals `expected`.
    /// Returns `true` if a key was removed.
    async fn compare_and_delete(&self, key: &str, expected: &str) -> AppResult<bool>;

    /// Check that the store backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
