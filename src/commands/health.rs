//! Store health check command.

use sessionlock_core::config::AppConfig;
use sessionlock_core::error::AppError;
use sessionlock_core::traits::LockStore;

use crate::output;

use super::Outcome;

/// Execute the health command
pub async fn execute(config: &AppConfig) -> Result<Outcome, AppError> {
    let store = super::create_store(config).await?;
    if store.health_check().await? {
        output::print_success(&format!("Store '{}' is reachable", config.store.provider));
        Ok(Outcome::Done)
    } else {
        Err(AppError::service_unavailable(format!(
            "Store '{}' did not answer the health check",
            config.store.provider
        )))
    }
}
