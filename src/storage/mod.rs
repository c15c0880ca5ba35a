//! Persistence backend for chat sessions and preferences
//!
//! The backend is a plain string-keyed, string-valued store. Callers
//! serialize whole values (for example the full session collection) and
//! write them back on every change; there is no atomicity across keys.
//!
//! Two implementations are provided:
//!
//! - [`MemoryStore`]: a process-local map, used by tests
//! - [`SledStore`]: an embedded `sled` database for the CLI

use crate::error::Result;
use std::sync::Arc;

pub mod memory;
pub mod sled_store;

pub use memory::MemoryStore;
pub use sled_store::SledStore;

/// Key holding the JSON array of chat sessions
pub const CHAT_SESSIONS_KEY: &str = "chatSessions";

/// Key holding the theme preference (`"dark"` or `"light"`)
pub const THEME_KEY: &str = "theme";

/// Key holding the JSON user profile
pub const CURRENT_USER_KEY: &str = "currentUser";

/// Abstract key-value persistence backend
///
/// # Examples
///
/// ```
/// use thinktank::storage::{KeyValueStore, MemoryStore};
///
/// # fn main() -> thinktank::error::Result<()> {
/// let store = MemoryStore::new();
/// store.set("theme", "dark")?;
/// assert_eq!(store.get("theme")?.as_deref(), Some("dark"));
/// store.remove("theme")?;
/// assert!(store.get("theme")?.is_none());
/// # Ok(())
/// # }
/// ```
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
