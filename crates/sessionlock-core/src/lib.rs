//! # sessionlock-core
//!
//! Core crate for the session lock workspace. Contains the store-client
//! trait, configuration schemas, and the unified error system.
//!
//! This crate has **no** internal dependencies on other sessionlock crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
