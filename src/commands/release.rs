//! Explicit-token release command.

use clap::Args;

use crate::output;
use sessionlock::LockToken;
use sessionlock_core::config::AppConfig;
use sessionlock_core::error::AppError;

use super::Outcome;

/// Arguments for the release command
#[derive(Debug, Args)]
pub struct ReleaseArgs {
    /// Session identifier whose lock to release
    pub session_id: String,
    /// Token printed when the lock was acquired
    pub token: String,
}

/// Execute the release command
pub async fn execute(args: &ReleaseArgs, config: &AppConfig) -> Result<Outcome, AppError> {
    let locker = super::create_locker(config).await?;
    let token = LockToken::from_string(args.token.as_str());

    if locker.release_token(&args.session_id, &token).await? {
        output::print_success(&format!("Released lock on session '{}'", args.session_id));
    } else {
        output::print_warning(&format!(
            "Session '{}' is not held by that token; nothing released",
            args.session_id
        ));
    }
    Ok(Outcome::Done)
}
