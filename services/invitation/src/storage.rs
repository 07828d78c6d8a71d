//! Durable client-side storage for the session
//!
//! Three keys are used: the access token, the refresh token and the
//! serialized user. The API client reads the access token on every request;
//! only the session store writes.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::{info, warn};

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const USER_KEY: &str = "user";

/// Error raised by a storage backend
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Type alias for Result with StorageError
pub type StorageResult<T> = Result<T, StorageError>;

/// Synchronous key/value storage, atomic at the single-key level
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Process-local storage, lost on exit
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

/// Storage persisted as a single JSON object on disk
///
/// Every write rewrites the whole file through a temporary sibling and a
/// rename, so readers never observe a half-written file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    /// Open the storage file, starting empty if it does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();

        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => HashMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        info!("Session storage opened at {}", path.display());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &HashMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = lock(&self.entries);
        let previous = entries.insert(key.to_string(), value.to_string());

        if let Err(e) = self.flush(&entries) {
            warn!("Failed to persist key {}: {}", key, e);
            match previous {
                Some(previous) => entries.insert(key.to_string(), previous),
                None => entries.remove(key),
            };
            return Err(e);
        }

        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = lock(&self.entries);
        let Some(previous) = entries.remove(key) else {
            return Ok(());
        };

        if let Err(e) = self.flush(&entries) {
            warn!("Failed to remove key {}: {}", key, e);
            entries.insert(key.to_string(), previous);
            return Err(e);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_set_get_remove() -> StorageResult<()> {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(ACCESS_TOKEN_KEY), None);

        storage.set(ACCESS_TOKEN_KEY, "token")?;
        assert_eq!(storage.get(ACCESS_TOKEN_KEY), Some("token".to_string()));

        storage.remove(ACCESS_TOKEN_KEY)?;
        assert_eq!(storage.get(ACCESS_TOKEN_KEY), None);
        Ok(())
    }

    #[test]
    fn test_file_storage_survives_reopen() -> StorageResult<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("session.json");

        let storage = FileStorage::open(&path)?;
        storage.set(ACCESS_TOKEN_KEY, "access")?;
        storage.set(REFRESH_TOKEN_KEY, "refresh")?;
        storage.remove(REFRESH_TOKEN_KEY)?;
        drop(storage);

        let reopened = FileStorage::open(&path)?;
        assert_eq!(reopened.get(ACCESS_TOKEN_KEY), Some("access".to_string()));
        assert_eq!(reopened.get(REFRESH_TOKEN_KEY), None);
        Ok(())
    }

    #[test]
    fn test_file_storage_failed_writes_keep_memory_in_sync() -> StorageResult<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("session.json");

        let storage = FileStorage::open(&path)?;
        storage.set(ACCESS_TOKEN_KEY, "access")?;

        // A directory where the temporary file goes makes every flush fail
        fs::create_dir(path.with_extension("tmp"))?;

        assert!(storage.remove(ACCESS_TOKEN_KEY).is_err());
        assert_eq!(storage.get(ACCESS_TOKEN_KEY), Some("access".to_string()));

        assert!(storage.set(ACCESS_TOKEN_KEY, "rotated").is_err());
        assert_eq!(storage.get(ACCESS_TOKEN_KEY), Some("access".to_string()));

        let reopened = FileStorage::open(&path)?;
        assert_eq!(reopened.get(ACCESS_TOKEN_KEY), Some("access".to_string()));
        Ok(())
    }

    #[test]
    fn test_file_storage_rejects_corrupt_file() -> StorageResult<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("session.json");
        fs::write(&path, "not json")?;

        assert!(matches!(
            FileStorage::open(&path),
            Err(StorageError::Serialization(_))
        ));
        Ok(())
    }
}
