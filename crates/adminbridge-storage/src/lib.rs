//! AdminBridge Storage - persisted session layer
//!
//! The session is a flat key -> JSON mapping shared by the transport, the
//! cache-backed stores and the auth session manager. It is always injected
//! as an `Arc<dyn SessionStore>` so the lifecycle stays explicit and tests can
//! swap in the in-memory implementation.
//!
//! # Keys
//!
//! - `token` - bearer credential, present only while authenticated
//! - `refresh_token` - optional refresh credential
//! - `userInfo` - cached user profile snapshot
//! - `lookupDict` - cached dictionary-type records
//!
//! Keys are never removed one by one; every logout or expiry path goes
//! through [`SessionStore::clear`].

pub mod memory;
pub mod persistent;

use anyhow::Result;
use serde_json::Value;

pub use memory::MemorySessionStore;
pub use persistent::RedbSessionStore;

/// Well-known session keys.
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const REFRESH_TOKEN: &str = "refresh_token";
    pub const USER_INFO: &str = "userInfo";
    pub const LOOKUP_DICT: &str = "lookupDict";

    /// Every key the session layer writes.
    pub const ALL: &[&str] = &[TOKEN, REFRESH_TOKEN, USER_INFO, LOOKUP_DICT];
}

/// Process-wide session storage.
pub trait SessionStore: Send + Sync {
    /// Read a value. Absent keys return `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Insert or replace a value.
    fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Drop every entry at once.
    fn clear(&self) -> Result<()>;

    /// List the keys currently stored.
    fn keys(&self) -> Result<Vec<String>>;

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}
