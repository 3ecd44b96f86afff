//! Lock inspection command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use sessionlock::keys;
use sessionlock_core::config::AppConfig;
use sessionlock_core::error::AppError;

use super::Outcome;

/// Arguments for the inspect command
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Session identifier to inspect
    pub session_id: String,
}

/// Current state of a session lock.
#[derive(Debug, Serialize, Tabled)]
pub struct HolderRow {
    /// Store key
    #[tabled(rename = "Key")]
    pub key: String,
    /// Whether a live lease exists
    #[tabled(rename = "Locked")]
    pub locked: bool,
    /// Holder token, or `-` when unlocked
    #[tabled(rename = "Holder")]
    pub holder: String,
}

/// Execute the inspect command
pub async fn execute(
    args: &InspectArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<Outcome, AppError> {
    let key = keys::session_lock(&args.session_id)?;
    let locker = super::create_locker(config).await?;
    let holder = locker.holder(&args.session_id).await?;

    let row = HolderRow {
        key: key.to_string(),
        locked: holder.is_some(),
        holder: holder.map_or_else(|| "-".to_string(), |t| t.to_string()),
    };
    output::print_row(&row, format);
    Ok(Outcome::Done)
}
