//! Validated acquisition parameters.

use std::time::Duration;

use sessionlock_core::config::lock::LockConfig;
use sessionlock_core::error::AppError;
use sessionlock_core::result::AppResult;

/// Parameters for one `acquire` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockRequest {
    session_id: String,
    ttl: Duration,
    wait_budget: Duration,
    retry_interval: Duration,
}

impl LockRequest {
    /// Build a request.
    ///
    /// `ttl` must be at least one millisecond and `retry_interval` non-zero.
    /// A zero `wait_budget` is allowed and means a single attempt.
    pub fn new(
        session_id: impl Into<String>,
        ttl: Duration,
        wait_budget: Duration,
        retry_interval: Duration,
    ) -> AppResult<Self> {
        let session_id = session_id.into();
        if session_id.trim().is_empty() {
            return Err(AppError::validation("Session id must not be empty"));
        }
        if ttl.as_millis() == 0 {
            return Err(AppError::validation(
                "Lock TTL must be at least one millisecond",
            ));
        }
        if retry_interval.is_zero() {
            return Err(AppError::validation("Retry interval must be positive"));
        }

        Ok(Self {
            session_id,
            ttl,
            wait_budget,
            retry_interval,
        })
    }

    /// Build a request from configured defaults.
    pub fn from_defaults(session_id: impl Into<String>, config: &LockConfig) -> AppResult<Self> {
        Self::new(
            session_id,
            config.ttl(),
            config.wait_budget(),
            config.retry_interval(),
        )
    }

    /// Session the lock is for.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Lease lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Maximum time spent retrying.
    pub fn wait_budget(&self) -> Duration {
        self.wait_budget
    }

    /// Fixed delay between attempts.
    pub fn retry_interval(&self) -> Duration {
        self.retry_interval
    }

    /// Upper bound on conditional-set attempts for this request when every
    /// attempt fails: `max(1, ceil(wait_budget / retry_interval))`.
    pub fn max_attempts(&self) -> u128 {
        let wait = self.wait_budget.as_nanos();
        let retry = self.retry_interval.as_nanos();
        wait.div_ceil(retry).max(1)
    }
}
