//! Durable key/value storage for client-side state.
//!
//! The cart is the only consumer today: it stores a single JSON payload
//! under [`crate::cart::CART_KEY`]. Backends only move opaque strings;
//! parsing and normalization belong to the store that owns the data.

use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("Storage I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },
}

/// Async key/value persistence used by [`crate::cart::CartStore`].
pub trait CartStorage: Send + Sync {
    /// Load the payload stored under `key`, or `None` if nothing was saved.
    fn load(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Replace the payload stored under `key`.
    fn save(&self, key: &str, payload: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

// =============================================================================
// File storage
// =============================================================================

/// One JSON file per key inside a data directory.
///
/// Writes go to a sibling temp file which is then renamed over the target,
/// so a crash mid-write leaves the previous payload intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `dir`. The directory is created on first save.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Data directory backing this storage.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CartStorage for FileStorage {
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    async fn save(&self, key: &str, payload: &str) -> Result<(), StorageError> {
        let io_err = |source: io::Error| StorageError::Io {
            key: key.to_string(),
            source,
        };

        tokio::fs::create_dir_all(&self.dir).await.map_err(io_err)?;

        let target = self.path_for(key);
        let staging = self.dir.join(format!("{key}.json.tmp"));
        tokio::fs::write(&staging, payload).await.map_err(io_err)?;
        tokio::fs::rename(&staging, &target).await.map_err(io_err)?;

        tracing::trace!(path = %target.display(), bytes = payload.len(), "Payload saved");
        Ok(())
    }
}

// =============================================================================
// Memory storage
// =============================================================================

/// In-process storage for ephemeral sessions.
///
/// Clones share the same map, so a clone kept outside a store observes every
/// write the store makes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `key` with `payload`, replacing any previous value.
    pub fn insert(&self, key: impl Into<String>, payload: impl Into<String>) {
        self.lock().insert(key.into(), payload.into());
    }

    /// Current payload under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CartStorage for MemoryStorage {
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get(key))
    }

    async fn save(&self, key: &str, payload: &str) -> Result<(), StorageError> {
        self.insert(key, payload);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_storage_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        assert!(storage.load("cart").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_storage_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        storage.save("cart", "[1,2]").await.unwrap();
        storage.save("cart", "[3]").await.unwrap();

        assert_eq!(storage.load("cart").await.unwrap().as_deref(), Some("[3]"));
        assert!(dir.path().join("nested/cart.json").exists());
        assert!(!dir.path().join("nested/cart.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_file_storage_unreadable_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the payload file should be cannot be read as text
        std::fs::create_dir(dir.path().join("cart.json")).unwrap();
        let storage = FileStorage::new(dir.path());

        let err = storage.load("cart").await.unwrap_err();
        assert!(matches!(err, StorageError::Io { ref key, .. } if key == "cart"));
    }

    #[tokio::test]
    async fn test_memory_storage_clones_share_entries() {
        let storage = MemoryStorage::new();
        let observer = storage.clone();

        storage.save("cart", "[]").await.unwrap();

        assert_eq!(observer.get("cart").as_deref(), Some("[]"));
        assert!(observer.load("wishlist").await.unwrap().is_none());
    }
}
