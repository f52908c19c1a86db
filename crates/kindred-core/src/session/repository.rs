//! Scoped store trait.
//!
//! Defines the key-value persistence boundary for session-scoped data.

use crate::error::Result;

/// A minimal key-value store scoped to one client session.
///
/// This trait decouples the session context store from the storage
/// technology behind it (process memory, a directory of JSON files, a
/// browser's session storage behind an FFI bridge, ...).
///
/// # Implementation Notes
///
/// - `get` returns `Ok(None)` for a key that was never written or was removed.
/// - `remove` of a missing key is not an error.
/// - Failures (quota exceeded, storage disabled, I/O) are reported as `Err`;
///   callers decide whether to degrade.
pub trait ScopedStore: Send + Sync {
    /// Reads the raw payload stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous payload.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the payload stored under `key`.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Prefix of every session context key.
pub const SESSION_KEY_PREFIX: &str = "kindred.session.";

/// Builds the store key for a session id.
pub fn session_key(session_id: &str) -> String {
    format!("{SESSION_KEY_PREFIX}{session_id}")
}
