use crate::error::{Result, ThinktankError};
use crate::storage::KeyValueStore;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory key-value store
///
/// Nothing survives the process. Useful for tests and for running the
/// session store without touching disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given entries
    ///
    /// # Examples
    ///
    /// ```
    /// use thinktank::storage::{KeyValueStore, MemoryStore};
    ///
    /// let store = MemoryStore::with_entries([("theme", "dark")]);
    /// assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
    /// ```
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: RwLock::new(map),
        }
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or_default()
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(|_| {
            ThinktankError::Storage("Failed to acquire read lock on memory store".to_string())
        })?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| {
            ThinktankError::Storage("Failed to acquire write lock on memory store".to_string())
        })?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| {
            ThinktankError::Storage("Failed to acquire write lock on memory store".to_string())
        })?;
        entries.remove(key);
        Ok(())
    }
}
