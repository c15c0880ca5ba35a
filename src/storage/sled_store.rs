use crate::error::{Result, ThinktankError};
use crate::storage::KeyValueStore;
use directories::ProjectDirs;
use sled::Db;
use std::path::{Path, PathBuf};

/// Key-value store backed by an embedded `sled` database
///
/// Every write is flushed to disk before returning.
pub struct SledStore {
    db: Db,
    path: PathBuf,
}

impl SledStore {
    /// Open or create a store at `path`
    ///
    /// Parent directories are created as needed.
    ///
    /// # Errors
    ///
    /// Returns `ThinktankError::Storage` if the database cannot be opened
    ///
    /// # Examples
    ///
    /// ```
    /// use thinktank::storage::{KeyValueStore, SledStore};
    ///
    /// # fn main() -> thinktank::error::Result<()> {
    /// let dir = tempfile::tempdir()?;
    /// let store = SledStore::open(dir.path().join("store"))?;
    /// store.set("theme", "dark")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ThinktankError::Storage(format!(
                    "Failed to create parent directory for store: {}",
                    e
                ))
            })?;
        }

        let db = sled::open(&path)
            .map_err(|e| ThinktankError::Storage(format!("Failed to open database: {}", e)))?;

        tracing::debug!("Opened session store at {}", path.display());

        Ok(Self { db, path })
    }

    /// Default store location inside the user's data directory
    ///
    /// # Errors
    ///
    /// Returns `ThinktankError::Storage` if no home directory can be determined
    pub fn default_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("ai", "thinktank", "thinktank").ok_or_else(|| {
            ThinktankError::Storage("Could not determine data directory".to_string())
        })?;
        Ok(proj_dirs.data_dir().join("store"))
    }

    /// Location of the database on disk
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        self.db
            .flush()
            .map_err(|e| ThinktankError::Storage(format!("Flush failed: {}", e)))?;
        Ok(())
    }
}

impl KeyValueStore for SledStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self
            .db
            .get(key.as_bytes())
            .map_err(|e| ThinktankError::Storage(format!("Get failed: {}", e)))?
        {
            Some(bytes) => {
                let value = String::from_utf8(bytes.to_vec()).map_err(|e| {
                    ThinktankError::Storage(format!("Value for '{}' is not UTF-8: {}", key, e))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db
            .insert(key.as_bytes(), value.as_bytes())
            .map_err(|e| ThinktankError::Storage(format!("Insert failed: {}", e)))?;
        self.flush()
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.db
            .remove(key.as_bytes())
            .map_err(|e| ThinktankError::Storage(format!("Remove failed: {}", e)))?;
        self.flush()
    }
}
