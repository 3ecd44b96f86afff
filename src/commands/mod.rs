//! CLI command definitions and dispatch.

pub mod acquire;
pub mod config;
pub mod health;
pub mod inspect;
pub mod release;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use sessionlock::SessionLocker;
use sessionlock_core::config::AppConfig;
use sessionlock_core::error::AppError;
use sessionlock_store::StoreManager;

/// Session lock operator tool
#[derive(Debug, Parser)]
#[command(name = "sessionlock", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay (`config/default.toml` + `config/{env}.toml`);
    /// takes precedence over `--config`
    #[arg(short, long)]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Acquire a session lock, hold it, then release it
    Acquire(acquire::AcquireArgs),
    /// Show the current holder of a session lock
    Inspect(inspect::InspectArgs),
    /// Release a session lock with an explicit token
    Release(release::ReleaseArgs),
    /// Check that the configured store is reachable
    Health,
    /// Show the effective configuration
    Config,
}

/// Result of a command that completed without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command did what was asked.
    Done,
    /// The lock was held by someone else for the whole wait budget.
    NotAcquired,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<Outcome, AppError> {
        match &self.command {
            Commands::Acquire(args) => acquire::execute(args, config, self.format).await,
            Commands::Inspect(args) => inspect::execute(args, config, self.format).await,
            Commands::Release(args) => release::execute(args, config).await,
            Commands::Health => health::execute(config).await,
            Commands::Config => config::execute(config, self.format),
        }
    }
}

/// Helper: load configuration from an environment overlay or a file
pub fn load_config(cli: &Cli) -> Result<AppConfig, AppError> {
    match &cli.env {
        Some(env) => AppConfig::load(env),
        None => AppConfig::load_from(&cli.config),
    }
}

/// Helper: connect to the configured store and build a locker
pub async fn create_locker(config: &AppConfig) -> Result<SessionLocker, AppError> {
    let manager = StoreManager::new(&config.store).await?;
    Ok(SessionLocker::new(manager.store()).with_release_mode(config.lock.release_mode))
}

/// Helper: connect to the configured store
pub async fn create_store(config: &AppConfig) -> Result<Arc<StoreManager>, AppError> {
    Ok(Arc::new(StoreManager::new(&config.store).await?))
}
