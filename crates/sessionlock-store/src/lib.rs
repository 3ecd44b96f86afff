//! # sessionlock-store
//!
//! Store backends for session locks. Supports two modes:
//!
//! - **memory**: In-process store on a sharded map, for single-node use and tests
//! - **redis**: Redis-backed store using the [redis](https://crates.io/crates/redis) crate
//!
//! The backend is selected at runtime based on configuration.

#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::StoreManager;
