//! Blob Storage Module
//!
//! Durable key-value storage holding the serialized cache mapping.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;

use crate::error::{ImageCacheError, Result};

/// Key under which the cache mapping is persisted.
pub const STORAGE_KEY: &str = "property_images_cache";

/// Storage for one serialized blob per key.
///
/// Each call is atomic at single-key granularity; callers never see a
/// partially written blob.
pub trait BlobStorage: Send + Sync {
    /// Returns the blob stored under `key`, or `None` if nothing was written.
    fn read_blob(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the blob stored under `key`.
    fn write_blob(&self, key: &str, blob: &str) -> Result<()>;
}

// == File Storage ==
/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileBlobStorage {
    dir: PathBuf,
}

impl FileBlobStorage {
    /// Creates the storage, creating `dir` if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl BlobStorage for FileBlobStorage {
    fn read_blob(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write_blob(&self, key: &str, blob: &str) -> Result<()> {
        // Each write gets its own temp file, renamed over the target when complete
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(blob.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.path_for(key)).map_err(|err| err.error)?;
        Ok(())
    }
}

// == Memory Storage ==
/// In-process storage, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryBlobStorage {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryBlobStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStorage for MemoryBlobStorage {
    fn read_blob(&self, key: &str) -> Result<Option<String>> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|_| ImageCacheError::Internal("storage lock poisoned".to_string()))?;
        Ok(blobs.get(key).cloned())
    }

    fn write_blob(&self, key: &str, blob: &str) -> Result<()> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| ImageCacheError::Internal("storage lock poisoned".to_string()))?;
        blobs.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryBlobStorage::new();
        assert!(storage.read_blob(STORAGE_KEY).unwrap().is_none());

        storage.write_blob(STORAGE_KEY, "{}").unwrap();
        assert_eq!(storage.read_blob(STORAGE_KEY).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_file_storage_missing_blob_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileBlobStorage::new(dir.path()).unwrap();
        assert!(storage.read_blob(STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_file_storage_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileBlobStorage::new(dir.path().join("nested")).unwrap();

        storage.write_blob(STORAGE_KEY, r#"{"1":1}"#).unwrap();
        storage.write_blob(STORAGE_KEY, r#"{"2":2}"#).unwrap();

        assert_eq!(
            storage.read_blob(STORAGE_KEY).unwrap().as_deref(),
            Some(r#"{"2":2}"#)
        );
        let leftovers = fs::read_dir(storage.dir()).unwrap().count();
        assert_eq!(leftovers, 1, "only the blob itself should remain");
    }

    #[test]
    fn test_file_storage_concurrent_writers_leave_a_whole_blob() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileBlobStorage::new(dir.path()).unwrap();
        let blobs: Vec<String> = (0..8)
            .map(|writer| format!(r#"{{"writer":{writer},"pad":"{}"}}"#, "x".repeat(4096)))
            .collect();

        std::thread::scope(|scope| {
            for blob in &blobs {
                let storage = &storage;
                scope.spawn(move || {
                    for _ in 0..20 {
                        storage.write_blob(STORAGE_KEY, blob).unwrap();
                    }
                });
            }
        });

        let stored = storage.read_blob(STORAGE_KEY).unwrap().unwrap();
        assert!(blobs.contains(&stored));
        assert_eq!(fs::read_dir(storage.dir()).unwrap().count(), 1);
    }
}
