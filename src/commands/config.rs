//! Effective configuration command.

use sessionlock_core::config::AppConfig;
use sessionlock_core::error::AppError;

use crate::output::{self, OutputFormat};

use super::Outcome;

/// Execute the config command
pub fn execute(config: &AppConfig, format: OutputFormat) -> Result<Outcome, AppError> {
    output::print_item(config, format);
    Ok(Outcome::Done)
}
