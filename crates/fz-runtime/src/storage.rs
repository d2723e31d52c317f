//! Storage APIs
//!
//! localStorage and sessionStorage. Local storage persists to a JSON file
//! on every write; an optional byte quota makes writes fail the way a full
//! browser store does.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is not a JSON object: {0}")]
    Format(#[from] serde_json::Error),

    #[error("quota exceeded writing {key:?}: {needed} bytes > {quota}")]
    QuotaExceeded { key: String, needed: usize, quota: usize },
}

/// Storage backend
#[derive(Debug, Default)]
pub struct Storage {
    data: BTreeMap<String, String>,
    path: Option<PathBuf>,
    quota: Option<usize>,
}

impl Storage {
    /// Create in-memory storage (sessionStorage)
    pub fn session() -> Self {
        Self::default()
    }

    /// Open persistent storage (localStorage) backed by `path`. A missing
    /// file starts empty.
    pub fn local(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents)?
            }
        } else {
            BTreeMap::new()
        };
        tracing::debug!("Opened local storage at {} ({} keys)", path.display(), data.len());
        Ok(Self { data, path: Some(path), quota: None })
    }

    /// Limit the total size of keys and values in bytes
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(|s| s.as_str())
    }

    /// Set item. On failure the previous value is kept.
    pub fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let needed = self.used_bytes() - self.entry_bytes(key) + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { key: key.to_string(), needed, quota });
            }
        }
        let previous = self.data.insert(key.to_string(), value.to_string());
        if let Err(err) = self.persist() {
            match previous {
                Some(prev) => self.data.insert(key.to_string(), prev),
                None => self.data.remove(key),
            };
            return Err(err);
        }
        Ok(())
    }

    pub fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        if self.data.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.data.clear();
        self.persist()
    }

    /// Key at index (sorted order)
    pub fn key(&self, index: usize) -> Option<&str> {
        self.data.keys().nth(index).map(|s| s.as_str())
    }

    pub fn length(&self) -> usize {
        self.data.len()
    }

    pub fn is_persistent(&self) -> bool {
        self.path.is_some()
    }

    fn entry_bytes(&self, key: &str) -> usize {
        self.data.get(key).map(|v| key.len() + v.len()).unwrap_or(0)
    }

    fn used_bytes(&self) -> usize {
        self.data.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    /// Persist to disk if persistent
    fn persist(&self) -> Result<(), StorageError> {
        if let Some(path) = &self.path {
            let contents = serde_json::to_string(&self.data)?;
            fs::write(path, contents)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("fz-runtime-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_session_storage() {
        let mut storage = Storage::session();

        storage.set_item("key1", "value1").unwrap();
        assert_eq!(storage.get_item("key1"), Some("value1"));

        storage.set_item("key2", "value2").unwrap();
        assert_eq!(storage.length(), 2);
        assert_eq!(storage.key(0), Some("key1"));

        storage.remove_item("key1").unwrap();
        assert_eq!(storage.get_item("key1"), None);

        storage.clear().unwrap();
        assert_eq!(storage.length(), 0);
    }

    #[test]
    fn test_local_storage_survives_reopen() {
        let path = temp_path("reopen");
        let _ = fs::remove_file(&path);

        let mut storage = Storage::local(&path).unwrap();
        storage.set_item("bookedSlots", r#"{"2025-11-12":["10:00"]}"#).unwrap();
        drop(storage);

        let storage = Storage::local(&path).unwrap();
        assert_eq!(storage.get_item("bookedSlots"), Some(r#"{"2025-11-12":["10:00"]}"#));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_quota_keeps_previous_value() {
        let mut storage = Storage::session().with_quota(16);
        storage.set_item("k", "short").unwrap();

        let err = storage.set_item("k", "much longer than the quota").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { quota: 16, .. }));
        assert_eq!(storage.get_item("k"), Some("short"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = temp_path("corrupt");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(Storage::local(&path), Err(StorageError::Format(_))));
        let _ = fs::remove_file(&path);
    }
}
