//! Storage error types.

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Nothing stored under the key.
    #[error("not found: {key}")]
    NotFound {
        /// Storage key that was not found.
        key: String,
    },

    /// Stored bytes exist but cannot be decoded.
    #[error("corrupt entry {key}: {reason}")]
    Corrupt {
        /// Storage key of the unreadable entry.
        key: String,
        /// Decoder message.
        reason: String,
    },

    /// Storage area configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// Underlying I/O failure (mount unavailable, disk full, permission denied).
    #[error("storage operation failed: {0}")]
    Operation(String),
}

impl StorageError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create a corrupt entry error.
    #[must_use]
    pub fn corrupt(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::Corrupt {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an operation error.
    #[must_use]
    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }

    /// Map an OpenDAL error raised while accessing `key`.
    #[must_use]
    pub fn at(key: &str, err: &opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::NotFound => Self::not_found(key),
            _ => Self::Operation(format!("{key}: {err}")),
        }
    }

    /// Whether this error reports plain absence.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
