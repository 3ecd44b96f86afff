//! Session lock CLI entry point.
//!
//! Loads configuration, initialises logging, and runs one lock command
//! against the configured store.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use sessionlock_core::config::logging::LoggingConfig;

mod commands;
mod output;

use commands::{Cli, Outcome};

/// Exit code used when a lock could not be acquired within its wait budget.
const EXIT_NOT_ACQUIRED: i32 = 2;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match commands::load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);
    tracing::debug!(config = %cli.config, provider = %config.store.provider, "Configuration loaded");

    match cli.execute(&config).await {
        Ok(Outcome::Done) => {}
        Ok(Outcome::NotAcquired) => std::process::exit(EXIT_NOT_ACQUIRED),
        Err(e) => {
            output::print_error(&e.to_string());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing/logging
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
