//! Session lock acquisition.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use sessionlock_core::config::lock::ReleaseMode;
use sessionlock_core::result::AppResult;
use sessionlock_core::traits::lock_store::LockStore;

use crate::handle::SessionLock;
use crate::keys::{self, LockKey};
use crate::release::ReleaseGuard;
use crate::request::LockRequest;
use crate::token::LockToken;

/// Deadline used when `now + wait_budget` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

/// Acquires and releases session locks against a shared store.
///
/// Holds no lock state of its own; every attempt and every release goes to
/// the store. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SessionLocker {
    store: Arc<dyn LockStore>,
    release_mode: ReleaseMode,
}

impl SessionLocker {
    /// Create a locker using get-then-delete release.
    pub fn new(store: Arc<dyn LockStore>) -> Self {
        Self {
            store,
            release_mode: ReleaseMode::default(),
        }
    }

    /// Choose how lock handles created by this locker release their lease.
    pub fn with_release_mode(mut self, mode: ReleaseMode) -> Self {
        self.release_mode = mode;
        self
    }

    /// The release strategy handed to new locks.
    pub fn release_mode(&self) -> ReleaseMode {
        self.release_mode
    }

    /// Try to take the lock for `request.session_id()`.
    ///
    /// Attempts a conditional set, then retries every `retry_interval` until
    /// it succeeds or the wait budget is spent. After a failed attempt the
    /// deadline is checked both before and after sleeping, so a failing
    /// call makes `max(1, ceil(wait_budget / retry_interval))` attempts and
    /// returns no earlier than the deadline. A zero budget means exactly
    /// one attempt.
    ///
    /// Returns `Ok(None)` when the budget runs out. Store errors abort the
    /// loop and propagate immediately.
    pub async fn acquire(&self, request: &LockRequest) -> AppResult<Option<SessionLock>> {
        let key = keys::session_lock(request.session_id())?;
        let token = LockToken::generate();
        let now = Instant::now();
        let deadline = now
            .checked_add(request.wait_budget())
            .unwrap_or_else(|| now + FAR_FUTURE);

        let mut attempts: u64 = 0;
        loop {
            attempts += 1;
            if self.try_set(&key, &token, request.ttl()).await? {
                info!(
                    session_id = %request.session_id(),
                    attempts,
                    ttl_ms = u64::try_from(request.ttl().as_millis()).unwrap_or(u64::MAX),
                    "Session lock acquired"
                );
                let guard = ReleaseGuard::new(Arc::clone(&self.store), self.release_mode);
                return Ok(Some(SessionLock::new(key, token, request.ttl(), guard)));
            }

            debug!(session_id = %request.session_id(), attempts, "Session lock busy");

            if Instant::now() >= deadline {
                break;
            }
            tokio::time::sleep(request.retry_interval()).await;
            if Instant::now() >= deadline {
                break;
            }
        }

        info!(
            session_id = %request.session_id(),
            attempts,
            wait_ms = u64::try_from(request.wait_budget().as_millis()).unwrap_or(u64::MAX),
            "Session lock not acquired within wait budget"
        );
        Ok(None)
    }

    /// Convenience form of [`acquire`](Self::acquire) taking raw parameters.
    pub async fn acquire_with(
        &self,
        session_id: &str,
        ttl: Duration,
        wait_budget: Duration,
        retry_interval: Duration,
    ) -> AppResult<Option<SessionLock>> {
        let request = LockRequest::new(session_id, ttl, wait_budget, retry_interval)?;
        self.acquire(&request).await
    }

    /// Run `work` while holding the session lock.
    ///
    /// Returns `Ok(None)` without running `work` if the lock is not acquired.
    /// The lease is released after `work` completes, whatever it returned.
    pub async fn with_lock<F, Fut, T>(&self, request: &LockRequest, work: F) -> AppResult<Option<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let Some(lock) = self.acquire(request).await? else {
            return Ok(None);
        };
        let output = work().await;
        lock.release().await?;
        Ok(Some(output))
    }

    /// Release a lease on behalf of a token obtained out of band.
    ///
    /// Returns `true` if the lease was deleted.
    pub async fn release_token(&self, session_id: &str, token: &LockToken) -> AppResult<bool> {
        let key = keys::session_lock(session_id)?;
        ReleaseGuard::new(Arc::clone(&self.store), self.release_mode)
            .release(&key, token)
            .await
    }

    /// Current holder token of a session's lease, if any.
    pub async fn holder(&self, session_id: &str) -> AppResult<Option<LockToken>> {
        let key = keys::session_lock(session_id)?;
        let value = self.store.get(key.as_str()).await?;
        Ok(value.map(LockToken::from_string))
    }

    async fn try_set(&self, key: &LockKey, token: &LockToken, ttl: Duration) -> AppResult<bool> {
        self.store.set_nx(key.as_str(), token.as_str(), ttl).await
    }
}
