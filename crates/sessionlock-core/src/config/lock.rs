//! Default lock parameters.
//!
//! The lock API always takes TTL, wait budget, and retry interval at call
//! time. These values are only the defaults a caller can opt into.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Caller-side defaults for session lock acquisition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockConfig {
    /// Lease lifetime in milliseconds.
    #[serde(default = "default_ttl")]
    pub ttl_ms: u64,
    /// Maximum time spent retrying acquisition, in milliseconds.
    #[serde(default)]
    pub wait_ms: u64,
    /// Fixed delay between acquisition attempts, in milliseconds.
    #[serde(default = "default_retry")]
    pub retry_ms: u64,
    /// How a lock holder removes its lease.
    #[serde(default)]
    pub release_mode: ReleaseMode,
}

impl LockConfig {
    /// Lease lifetime as a [`Duration`].
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    /// Wait budget as a [`Duration`].
    pub fn wait_budget(&self) -> Duration {
        Duration::from_millis(self.wait_ms)
    }

    /// Retry interval as a [`Duration`].
    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_ms)
    }
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            ttl_ms: default_ttl(),
            wait_ms: 0,
            retry_ms: default_retry(),
            release_mode: ReleaseMode::default(),
        }
    }
}

/// Strategy used to delete a lease on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseMode {
    /// Read the lease, and delete it only if it still carries our token.
    /// The two store calls are not atomic.
    #[default]
    GetThenDelete,
    /// Use the store's atomic compare-and-delete primitive.
    CompareAndDelete,
}

impl std::fmt::Display for ReleaseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReleaseMode::GetThenDelete => write!(f, "get_then_delete"),
            ReleaseMode::CompareAndDelete => write!(f, "compare_and_delete"),
        }
    }
}

fn default_ttl() -> u64 {
    5000
}

fn default_retry() -> u64 {
    10
}
