//! Storage errors
//!
//! Failures of the key-value namespace and of encoding records. Write
//! failures carry a hint for the user through
//! [`StorageError::recovery_suggestion`].

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Step of a namespace operation that touched the filesystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoStep {
    Read,
    Write,
    Rename,
    Remove,
}

impl IoStep {
    fn verb(self) -> &'static str {
        match self {
            IoStep::Read => "read",
            IoStep::Write => "write",
            IoStep::Rename => "replace",
            IoStep::Remove => "remove",
        }
    }
}

/// Errors raised by a namespace or a record store
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Permission denied for '{path}'")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No space left to store '{path}'")]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not {} '{path}': {source}", .step.verb())]
    Io {
        step: IoStep,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A collection could not be encoded as JSON
    #[error("Invalid data under key '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The namespace refused the write
    #[error("Storage quota exceeded for key '{key}'")]
    QuotaExceeded { key: String },
}

impl StorageError {
    /// Classify an I/O failure at `step` on `path`
    pub fn io(step: IoStep, error: io::Error, path: PathBuf) -> Self {
        if error.kind() == io::ErrorKind::PermissionDenied {
            return StorageError::PermissionDenied {
                path,
                source: error,
            };
        }

        let message = error.to_string().to_lowercase();
        if message.contains("no space left") || message.contains("quota") {
            return StorageError::DiskFull {
                path,
                source: error,
            };
        }

        StorageError::Io {
            step,
            path,
            source: error,
        }
    }

    /// What the user can do about it, when there is something to do
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StorageError::DiskFull { .. } | StorageError::QuotaExceeded { .. } => {
                Some("Free up disk space and try again")
            }
            StorageError::PermissionDenied { .. } => {
                Some("Check the permissions of the data directory")
            }
            StorageError::Io { .. } | StorageError::Serialization { .. } => None,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_has_hint() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = StorageError::io(
            IoStep::Write,
            io_err,
            PathBuf::from("/data/farber_budgets.json"),
        );

        assert!(matches!(err, StorageError::PermissionDenied { .. }));
        assert_eq!(
            err.recovery_suggestion(),
            Some("Check the permissions of the data directory")
        );
    }

    #[test]
    fn test_no_space_is_disk_full() {
        let io_err = io::Error::new(io::ErrorKind::Other, "No space left on device");
        let err = StorageError::io(
            IoStep::Write,
            io_err,
            PathBuf::from("/full/farber_orders.json"),
        );

        assert!(matches!(err, StorageError::DiskFull { .. }));
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_other_failures_name_the_step() {
        let io_err = io::Error::new(io::ErrorKind::Other, "device busy");
        let err = StorageError::io(
            IoStep::Rename,
            io_err,
            PathBuf::from("/data/farber_config.json"),
        );

        assert!(err.to_string().starts_with("Could not replace"));
        assert_eq!(err.recovery_suggestion(), None);
    }

    #[test]
    fn test_quota_exceeded_display() {
        let err = StorageError::QuotaExceeded {
            key: "farber_budgets".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("quota"));
        assert!(msg.contains("farber_budgets"));
    }
}
