//! Core traits defined in `sessionlock-core` and implemented by other crates.

pub mod lock_store;

pub use lock_store::LockStore;
