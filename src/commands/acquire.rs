//! Acquire-hold-release command.

use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use sessionlock::{LockRequest, ReleaseMode, SessionLock};
use sessionlock_core::config::AppConfig;
use sessionlock_core::config::lock::LockConfig;
use sessionlock_core::error::AppError;

use super::Outcome;

/// Arguments for the acquire command
#[derive(Debug, Args)]
pub struct AcquireArgs {
    /// Session identifier to lock
    pub session_id: String,
    /// Lease lifetime in milliseconds (defaults to `lock.ttl_ms`)
    #[arg(long)]
    pub ttl_ms: Option<u64>,
    /// Wait budget in milliseconds (defaults to `lock.wait_ms`)
    #[arg(long)]
    pub wait_ms: Option<u64>,
    /// Retry interval in milliseconds (defaults to `lock.retry_ms`)
    #[arg(long)]
    pub retry_ms: Option<u64>,
    /// How long to hold the lock before releasing it
    #[arg(long, default_value_t = 0)]
    pub hold_ms: u64,
}

/// A held lock as printed by the CLI.
#[derive(Debug, Serialize, Tabled)]
pub struct LockSummary {
    /// Session id
    #[tabled(rename = "Session")]
    pub session_id: String,
    /// Store key
    #[tabled(rename = "Key")]
    pub key: String,
    /// Ownership token
    #[tabled(rename = "Token")]
    pub token: String,
    /// Lease lifetime
    #[tabled(rename = "TTL (ms)")]
    pub ttl_ms: u64,
    /// Acquisition time
    #[tabled(rename = "Acquired")]
    pub acquired_at: DateTime<Utc>,
    /// Release strategy
    #[tabled(rename = "Release")]
    pub release_mode: ReleaseMode,
}

impl LockSummary {
    fn new(lock: &SessionLock, release_mode: ReleaseMode) -> Self {
        Self {
            session_id: lock.session_id().to_string(),
            key: lock.key().to_string(),
            token: lock.token().to_string(),
            ttl_ms: u64::try_from(lock.ttl().as_millis()).unwrap_or(u64::MAX),
            acquired_at: lock.acquired_at(),
            release_mode,
        }
    }
}

/// Execute the acquire command
pub async fn execute(
    args: &AcquireArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<Outcome, AppError> {
    let defaults = LockConfig {
        ttl_ms: args.ttl_ms.unwrap_or(config.lock.ttl_ms),
        wait_ms: args.wait_ms.unwrap_or(config.lock.wait_ms),
        retry_ms: args.retry_ms.unwrap_or(config.lock.retry_ms),
        ..config.lock.clone()
    };
    let request = LockRequest::from_defaults(args.session_id.as_str(), &defaults)?;

    let locker = super::create_locker(config).await?;
    let Some(lock) = locker.acquire(&request).await? else {
        output::print_warning(&format!(
            "Session '{}' is locked by another holder",
            args.session_id
        ));
        return Ok(Outcome::NotAcquired);
    };

    output::print_row(&LockSummary::new(&lock, locker.release_mode()), format);

    if args.hold_ms > 0 {
        tokio::time::sleep(Duration::from_millis(args.hold_ms)).await;
    }

    lock.release().await?;
    output::print_success(&format!("Released lock on session '{}'", args.session_id));
    Ok(Outcome::Done)
}
