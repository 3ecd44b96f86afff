//! The handle returned to a successful acquirer.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::info;

use sessionlock_core::result::AppResult;

use crate::keys::LockKey;
use crate::release::ReleaseGuard;
use crate::token::LockToken;

/// A held session lock.
///
/// Owned by the caller that acquired it. There is no renewal: once `ttl`
/// has elapsed the store may hand the lease to someone else, and `release`
/// then leaves the new holder alone. Dropping the handle does not release
/// the lease; it expires with its TTL.
#[derive(Debug)]
#[must_use = "a session lock is held until released or until its TTL expires"]
pub struct SessionLock {
    token: LockToken,
    key: LockKey,
    ttl: Duration,
    acquired_at: DateTime<Utc>,
    guard: ReleaseGuard,
}

impl SessionLock {
    pub(crate) fn new(key: LockKey, token: LockToken, ttl: Duration, guard: ReleaseGuard) -> Self {
        Self {
            token,
            key,
            ttl,
            acquired_at: Utc::now(),
            guard,
        }
    }

    /// Ownership token, for diagnostics and tests.
    pub fn token(&self) -> &LockToken {
        &self.token
    }

    /// Session this lock serializes.
    pub fn session_id(&self) -> &str {
        self.key.session_id()
    }

    /// Store key of the lease.
    pub fn key(&self) -> &LockKey {
        &self.key
    }

    /// Lease lifetime requested at acquisition.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Wall-clock time the lease was obtained.
    pub fn acquired_at(&self) -> DateTime<Utc> {
        self.acquired_at
    }

    /// Release the lease if this handle still owns it.
    ///
    /// Safe to call more than once; later calls find the lease gone (or
    /// owned by another token) and do nothing. Store failures propagate.
    pub async fn release(&self) -> AppResult<()> {
        let removed = self.guard.release(&self.key, &self.token).await?;
        if removed {
            info!(session_id = %self.session_id(), "Session lock released");
        }
        Ok(())
    }
}
