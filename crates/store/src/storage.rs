//! Key-value storage backends.
//!
//! Layouts are persisted as strings under a key, the same way a browser's
//! local storage holds them. Two backends are provided:
//!
//! - [`FileStorage`]: one JSON file per key in a directory
//! - [`MemoryStorage`]: an in-process map with an optional byte quota
//!
//! # Directory Structure
//!
//! ```text
//! ~/.local/share/cardgrid/       # Linux
//! ~/Library/Application Support/cardgrid/  # macOS
//! └── storage/
//!     └── {key}.json
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use tracing::{debug, instrument, warn};

use crate::error::StorageError;

/// A string key-value store.
///
/// Implementations must be shareable across tasks, since the autosaver
/// writes from a spawned task.
pub trait Storage: Send + Sync {
    /// Returns the value for `key`, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written or is full.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Returns `true` if a value is stored under `key`.
    fn contains(&self, key: &str) -> bool;
}

/// Storage backed by one file per key.
///
/// # Examples
///
/// ```
/// use cardgrid_store::storage::{FileStorage, Storage};
///
/// # fn example() -> Result<(), cardgrid_store::StorageError> {
/// let dir = tempfile::tempdir().expect("temp dir");
/// let storage = FileStorage::with_path(dir.path().join("storage"))?;
///
/// storage.set("greeting", "\"hello\"")?;
/// assert_eq!(storage.get("greeting")?.as_deref(), Some("\"hello\""));
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Debug)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Creates storage in the platform data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be determined or created.
    #[instrument]
    pub fn new() -> Result<Self, StorageError> {
        let data_dir = dirs::data_dir().ok_or(StorageError::NoDataDirectory)?;
        Self::with_path(data_dir.join("cardgrid").join("storage"))
    }

    /// Creates storage at a custom path, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    #[instrument]
    pub fn with_path(base_path: PathBuf) -> Result<Self, StorageError> {
        if !base_path.exists() {
            debug!(?base_path, "creating storage directory");
            fs::create_dir_all(&base_path).map_err(|source| StorageError::Io {
                key: String::new(),
                source,
            })?;
        }

        Ok(Self { base_path })
    }

    /// Returns the directory holding the files.
    #[must_use]
    pub fn base_path(&self) -> &std::path::Path {
        &self.base_path
    }

    /// Returns the file path for a key.
    ///
    /// Path separators and dots are replaced so a key can never escape the
    /// storage directory.
    fn key_path(&self, key: &str) -> PathBuf {
        let safe_key = key.replace(['/', '\\', '.'], "_");
        self.base_path.join(format!("{safe_key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => {
                warn!(?path, error = %source, "failed to read storage file");
                Err(StorageError::Io {
                    key: key.to_string(),
                    source,
                })
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.key_path(key);
        fs::write(&path, value).map_err(|source| StorageError::Io {
            key: key.to_string(),
            source,
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.key_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.key_path(key).is_file()
    }
}

/// In-memory storage with an optional capacity.
///
/// The quota counts the bytes of every key and value held, like the
/// per-origin limit of browser storage.
///
/// # Examples
///
/// ```
/// use cardgrid_store::StorageError;
/// use cardgrid_store::storage::{MemoryStorage, Storage};
///
/// let storage = MemoryStorage::with_quota(8);
/// assert!(storage.set("k", "small").is_ok());
/// assert!(matches!(
///     storage.set("k", "much too large"),
///     Err(StorageError::QuotaExceeded { .. })
/// ));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Creates unbounded storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage that refuses writes beyond `quota` bytes.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: Mutex::default(),
            quota: Some(quota),
        }
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries();
        if let Some(quota) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    quota,
                });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }

    fn contains(&self, key: &str) -> bool {
        self.entries().contains_key(key)
    }
}
