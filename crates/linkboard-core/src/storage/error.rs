//! Storage error handling
//!
//! Typed errors for the local database and the remote document store, with
//! recovery hints the CLI prints next to the message.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// Data directory could not be created
    #[error("Failed to create data directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Permission denied accessing path
    #[error("Permission denied: cannot access '{path}'. Check file permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Disk is full or quota exceeded
    #[error("Disk full or quota exceeded while writing to '{path}'")]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// SQLite database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored value could not be encoded or decoded
    #[error("Invalid JSON for '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Remote document store could not be reached
    #[error("Remote store request to '{url}' failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Remote document store answered with a non-success status
    #[error("Remote store returned HTTP {status} for '{url}'")]
    HttpStatus { url: String, status: u16 },

    /// A remote document did not have the expected shape
    #[error("Invalid document '{id}' in collection '{collection}': {details}")]
    InvalidDocument {
        collection: String,
        id: String,
        details: String,
    },
}

impl StorageError {
    /// Classify a failure to create the data directory at `path`
    pub fn directory(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => StorageError::PermissionDenied {
                path,
                source: error,
            },
            _ if is_disk_full_error(&error) => StorageError::DiskFull {
                path,
                source: error,
            },
            _ => StorageError::CreateDirectory {
                path,
                source: error,
            },
        }
    }

    /// Wrap a JSON error with the key it belongs to
    pub fn serialization(key: impl Into<String>, source: serde_json::Error) -> Self {
        StorageError::Serialization {
            key: key.into(),
            source,
        }
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StorageError::DiskFull { .. } => Some("Free up disk space and try again."),
            StorageError::PermissionDenied { .. } => Some(
                "Check file and directory permissions, or point data_dir elsewhere with `linkboard config set data_dir <path>`.",
            ),
            StorageError::CreateDirectory { .. } => {
                Some("Check that the parent directory exists and you have write permissions.")
            }
            StorageError::Http { .. } | StorageError::HttpStatus { .. } => Some(
                "Check remote_url, or disable the remote store with `linkboard config set remote_enabled false`.",
            ),
            _ => None,
        }
    }
}

/// Check if an I/O error indicates disk full condition
fn is_disk_full_error(error: &io::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left") || msg.contains("quota exceeded")
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_permission_denied() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = StorageError::directory(io_err, PathBuf::from("/srv/linkboard"));

        assert!(matches!(err, StorageError::PermissionDenied { .. }));
        assert!(err.recovery_suggestion().unwrap().contains("data_dir"));
    }

    #[test]
    fn test_directory_disk_full() {
        let io_err = io::Error::new(io::ErrorKind::Other, "No space left on device");
        let err = StorageError::directory(io_err, PathBuf::from("/full/disk"));
        assert!(matches!(err, StorageError::DiskFull { .. }));
    }

    #[test]
    fn test_directory_other_failure() {
        let io_err = io::Error::new(io::ErrorKind::AlreadyExists, "is a file");
        let err = StorageError::directory(io_err, PathBuf::from("/tmp/board"));
        assert!(matches!(err, StorageError::CreateDirectory { .. }));
        assert!(err.to_string().contains("/tmp/board"));
    }

    #[test]
    fn test_http_status_suggestion() {
        let err = StorageError::HttpStatus {
            url: "http://store/links".to_string(),
            status: 503,
        };
        assert!(err.to_string().contains("503"));
        assert!(err
            .recovery_suggestion()
            .unwrap()
            .contains("remote_enabled false"));
    }

    #[test]
    fn test_serialization_display() {
        let source = serde_json::from_str::<Vec<String>>("not json").unwrap_err();
        let err = StorageError::serialization("favorites", source);
        assert!(err.to_string().contains("favorites"));
        assert!(err.recovery_suggestion().is_none());
    }
}
