//! # sessionlock
//!
//! Distributed mutual exclusion keyed by session identifier.
//!
//! Concurrent requests for the same logical session, possibly served by
//! different processes, serialize on a TTL-bound lease in a shared store.
//! The lease is taken with an atomic conditional set and removed only by
//! the holder whose token it still carries.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use sessionlock::{LockRequest, SessionLocker};
//! use sessionlock_core::config::store::MemoryStoreConfig;
//! use sessionlock_store::memory::MemoryLockStore;
//!
//! # async fn run() -> sessionlock_core::AppResult<()> {
//! let store = Arc::new(MemoryLockStore::new(&MemoryStoreConfig::default()));
//! let locker = SessionLocker::new(store);
//!
//! let request = LockRequest::new(
//!     "session-id-1",
//!     Duration::from_secs(5),
//!     Duration::from_millis(500),
//!     Duration::from_millis(100),
//! )?;
//!
//! match locker.acquire(&request).await? {
//!     Some(lock) => {
//!         // protected work
//!         lock.release().await?;
//!     }
//!     None => {
//!         // someone else holds the session; answer with a conflict
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Known limitations: waiters are not ordered, the lock is not reentrant,
//! and a lease cannot be extended. A critical section that outlives its TTL
//! loses the lock silently.

pub mod handle;
pub mod keys;
pub mod locker;
pub mod release;
pub mod request;
pub mod token;

pub use handle::SessionLock;
pub use keys::LockKey;
pub use locker::SessionLocker;
pub use release::ReleaseGuard;
pub use request::LockRequest;
pub use sessionlock_core::config::lock::ReleaseMode;
pub use token::LockToken;
