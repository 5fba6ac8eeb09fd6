//! Document error types.

use thiserror::Error;

use super::id::{DocumentId, StoredName};
use crate::storage::StorageError;

/// Document operation errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// No record exists under the identifier.
    #[error("document not found: {0}")]
    NotFound(DocumentId),

    /// Record exists but its blob does not.
    #[error("document {id} has no blob {stored_name}")]
    BlobMissing {
        /// Identifier of the dangling record.
        id: DocumentId,
        /// Blob name the record points at.
        stored_name: StoredName,
    },

    /// Record exists but cannot be parsed.
    #[error("document record {id} is unreadable: {reason}")]
    CorruptRecord {
        /// Identifier of the unreadable record.
        id: DocumentId,
        /// Decoder message.
        reason: String,
    },

    /// Upload rejected by the allow-list.
    #[error("unsupported file type: {file_name} ({content_type})")]
    UnsupportedType {
        /// File name supplied by the uploader.
        file_name: String,
        /// Declared MIME type.
        content_type: String,
    },

    /// Upload exceeds the size limit.
    #[error("file too large: {size} bytes exceeds maximum {max} bytes")]
    TooLarge {
        /// Actual upload size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },

    /// Storage write failed while creating or deleting a document.
    #[error("storage write failed: {0}")]
    Write(#[source] StorageError),

    /// Storage read failed for a reason other than absence or corruption.
    #[error("storage read failed: {0}")]
    Storage(#[source] StorageError),
}

impl DocumentError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(id: &DocumentId) -> Self {
        Self::NotFound(id.clone())
    }

    /// Create an unsupported type error.
    #[must_use]
    pub fn unsupported_type(file_name: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self::UnsupportedType {
            file_name: file_name.into(),
            content_type: content_type.into(),
        }
    }

    /// Create a too large error.
    #[must_use]
    pub fn too_large(size: u64, max: u64) -> Self {
        Self::TooLarge { size, max }
    }

    /// Whether the error is a store integrity violation rather than plain absence.
    #[must_use]
    pub fn is_integrity_anomaly(&self) -> bool {
        matches!(self, Self::BlobMissing { .. } | Self::CorruptRecord { .. })
    }

    /// Whether callers should see the error as "resource does not exist".
    #[must_use]
    pub fn is_not_found_class(&self) -> bool {
        matches!(self, Self::NotFound(_)) || self.is_integrity_anomaly()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_class() {
        let stored = StoredName::parse("document-1.pdf").expect("valid");
        let missing = DocumentError::BlobMissing {
            id: stored.document_id(),
            stored_name: stored,
        };
        assert!(missing.is_integrity_anomaly());
        assert!(missing.is_not_found_class());

        let absent = DocumentError::not_found(&DocumentId::parse("document-2").expect("valid"));
        assert!(!absent.is_integrity_anomaly());
        assert!(absent.is_not_found_class());

        let rejected = DocumentError::unsupported_type("a.exe", "application/x-msdownload");
        assert!(!rejected.is_not_found_class());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            DocumentError::too_large(2048, 1024).to_string(),
            "file too large: 2048 bytes exceeds maximum 1024 bytes"
        );
        assert_eq!(
            DocumentError::not_found(&DocumentId::parse("document-9").expect("valid")).to_string(),
            "document not found: document-9"
        );
    }
}
