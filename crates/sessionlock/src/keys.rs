//! Lock key construction.

use std::fmt;

use serde::{Deserialize, Serialize};

use sessionlock_core::error::AppError;
use sessionlock_core::result::AppResult;

/// Literal prefix of every session lock key.
pub const SESSION_LOCK_PREFIX: &str = "SESSION_LOCK:";

/// Store key under which a session's lease lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockKey(String);

impl LockKey {
    /// The full key as sent to the store.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The session id this key was built from.
    pub fn session_id(&self) -> &str {
        self.0.strip_prefix(SESSION_LOCK_PREFIX).unwrap_or(&self.0)
    }
}

impl fmt::Display for LockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LockKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Build the lock key for a session.
///
/// The session id is used verbatim; only empty or all-whitespace ids are
/// rejected.
pub fn session_lock(session_id: &str) -> AppResult<LockKey> {
    if session_id.trim().is_empty() {
        return Err(AppError::validation("Session id must not be empty"));
    }
    Ok(LockKey(format!("{SESSION_LOCK_PREFIX}{session_id}")))
}
