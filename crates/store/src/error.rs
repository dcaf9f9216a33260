//! Error types for layout persistence.
//!
//! [`StorageError`] covers the key-value backends. [`StoreError`] covers the
//! layout operations built on top of them, including import and export.

use std::path::PathBuf;

/// Errors raised by a [`Storage`](crate::storage::Storage) backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// An I/O error while accessing a key.
    #[error("storage I/O error for key {key}: {source}")]
    Io {
        /// The key being accessed.
        key: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The write would exceed the backend's capacity.
    #[error("storage quota exceeded writing {key}: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded {
        /// The key being written.
        key: String,
        /// Total bytes the backend would hold after the write.
        needed: usize,
        /// The backend's capacity in bytes.
        quota: usize,
    },

    /// The platform data directory could not be determined.
    #[error("could not determine data directory")]
    NoDataDirectory,
}

/// Errors raised by layout operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The storage backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A layout could not be serialized.
    #[error("failed to serialize layout: {0}")]
    Serialize(#[source] serde_json::Error),

    /// An import file could not be read.
    #[error("failed to read layout file {path}: {source}")]
    ReadImport {
        /// The file being imported.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An import file is not valid JSON.
    #[error("failed to parse layout file {path}: {source}")]
    ParseImport {
        /// The file being imported.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// An import file is JSON but not a layout.
    #[error("invalid layout file: {reason}")]
    InvalidImport {
        /// What is wrong with the file.
        reason: String,
    },

    /// An export file could not be written.
    #[error("failed to write layout file {path}: {source}")]
    WriteExport {
        /// The destination file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// A specialized Result type for layout operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_quota() {
        let err = StorageError::QuotaExceeded {
            key: "layout".to_string(),
            needed: 2048,
            quota: 1024,
        };
        assert_eq!(
            err.to_string(),
            "storage quota exceeded writing layout: 2048 bytes needed, 1024 allowed"
        );
    }

    #[test]
    fn error_display_invalid_import() {
        let err = StoreError::InvalidImport {
            reason: "cards must be an array".to_string(),
        };
        assert_eq!(err.to_string(), "invalid layout file: cards must be an array");
    }

    #[test]
    fn storage_error_is_transparent() {
        let err = StoreError::from(StorageError::NoDataDirectory);
        assert_eq!(err.to_string(), "could not determine data directory");
    }
}
