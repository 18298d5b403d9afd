//! Key-value persistence surface
//!
//! History stores never touch a concrete backend; they are handed an
//! implementation of [`KeyValueStore`] and treat it as a best-effort mirror.
//! Three implementations live in the crate: [`MemoryStore`] for tests and
//! ephemeral sessions, [`FileStore`] (one JSON file per key) and
//! [`crate::database::SqliteStore`].

use crate::config::{Config, StorageBackend};
use crate::database::SqliteStore;
use crate::error::{Error, Result};
use crate::types::StorageKey;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Common interface for persistence backends
///
/// All methods take `&self`; implementations handle their own locking.
pub trait KeyValueStore: Send + Sync {
    /// Read the serialized value stored under `key`
    #[must_use = "Query results should be used"]
    fn get(&self, key: &StorageKey) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn set(&self, key: &StorageKey, value: &str) -> Result<()>;

    /// Remove `key` entirely. Missing keys are not an error.
    fn delete(&self, key: &StorageKey) -> Result<()>;
}

/// Open the backend selected in the configuration
pub fn open_store(config: &Config) -> Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.storage.backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::File => Arc::new(FileStore::new(&config.storage.path)?),
        StorageBackend::Sqlite => Arc::new(SqliteStore::open(&config.storage.path)?),
    };
    Ok(store)
}

fn poisoned<T>(_: PoisonError<T>) -> Error {
    Error::custom("storage lock poisoned")
}

/// In-process store backed by a `HashMap`
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<StorageKey, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject any single value larger than `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            quota: Some(bytes),
        }
    }

    /// Whether anything is stored under `key`
    pub fn contains(&self, key: &StorageKey) -> bool {
        self.values
            .lock()
            .map(|values| values.contains_key(key))
            .unwrap_or(false)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &StorageKey) -> Result<Option<String>> {
        let values = self.values.lock().map_err(poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &StorageKey, value: &str) -> Result<()> {
        if let Some(limit) = self.quota {
            if value.len() > limit {
                return Err(Error::QuotaExceeded {
                    key: key.to_string(),
                    size: value.len(),
                    limit,
                });
            }
        }
        let mut values = self.values.lock().map_err(poisoned)?;
        values.insert(key.clone(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &StorageKey) -> Result<()> {
        let mut values = self.values.lock().map_err(poisoned)?;
        values.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create the store, creating `dir` if it doesn't exist
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, key: &StorageKey) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &StorageKey) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &StorageKey, value: &str) -> Result<()> {
        // Write then rename so a crash never leaves a half-written file
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn delete(&self, key: &StorageKey) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
