//! Document record manager.
//!
//! Owns the link between a blob and its metadata record. Creation writes the
//! blob first and the record second, so a crash in between leaves an
//! invisible orphan blob instead of a record pointing at nothing. Deletion
//! removes the blob first and the record last for the same reason.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{error, info, warn};

use super::error::DocumentError;
use super::id::DocumentId;
use super::policy::UploadPolicy;
use super::types::{DocumentContent, DocumentRecord};
use crate::storage::{BlobStore, MetadataStore, StorageError, report_corrupt_record};

/// Repository trait for metadata record persistence.
///
/// Implemented by [`MetadataStore`] on the shared filesystem.
pub trait RecordStore: Send + Sync {
    /// Write a full record, named by its id.
    fn put(
        &self,
        record: &DocumentRecord,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;

    /// Read one record. `NotFound` if absent, `Corrupt` if unparsable.
    fn get(
        &self,
        id: &DocumentId,
    ) -> impl std::future::Future<Output = Result<DocumentRecord, StorageError>> + Send;

    /// Delete one record. Idempotent.
    fn delete(
        &self,
        id: &DocumentId,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;

    /// Read every parsable record, skipping entries that fail to parse.
    fn list_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<DocumentRecord>, StorageError>> + Send;
}

/// Document service: create, look up, list, and delete documents.
pub struct DocumentService<R: RecordStore = MetadataStore> {
    blobs: Arc<BlobStore>,
    records: Arc<R>,
    policy: UploadPolicy,
}

impl<R: RecordStore> DocumentService<R> {
    /// Create a new document service.
    #[must_use]
    pub fn new(blobs: Arc<BlobStore>, records: Arc<R>, policy: UploadPolicy) -> Self {
        Self {
            blobs,
            records,
            policy,
        }
    }

    /// Admission rules in force.
    #[must_use]
    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Store a new document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The upload exceeds the size limit (`TooLarge`)
    /// - The extension or MIME type is not allowed (`UnsupportedType`)
    /// - The blob or the record cannot be written (`Write`). If only the
    ///   record write fails, the blob stays behind as an orphan.
    pub async fn create(
        &self,
        bytes: Bytes,
        original_name: &str,
        content_type: &str,
    ) -> Result<DocumentRecord, DocumentError> {
        let size_bytes = bytes.len() as u64;
        self.policy.check(original_name, content_type, size_bytes)?;

        let stored_name = self
            .blobs
            .put(bytes, original_name)
            .await
            .map_err(DocumentError::Write)?;

        let record = DocumentRecord {
            id: stored_name.document_id(),
            original_name: original_name.to_string(),
            stored_name,
            size_bytes,
            content_type: content_type.to_string(),
            created_at: Utc::now(),
        };

        // No rollback: the filesystem offers no transaction, and an orphan
        // blob is never visible to lookups or listings.
        if let Err(e) = self.records.put(&record).await {
            warn!(
                id = %record.id,
                stored_name = %record.stored_name,
                error = %e,
                "Metadata write failed, orphaned blob left for cleanup"
            );
            return Err(DocumentError::Write(e));
        }

        info!(
            id = %record.id,
            stored_name = %record.stored_name,
            size_bytes = record.size_bytes,
            "Document created"
        );
        Ok(record)
    }

    /// Get a document record, verifying its blob is present.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no record exists, `CorruptRecord` if it cannot be
    /// parsed, and `BlobMissing` if the record exists without its blob.
    pub async fn get(&self, id: &DocumentId) -> Result<DocumentRecord, DocumentError> {
        let record = self.load_record(id).await?;

        match self.blobs.stat(&record.stored_name).await {
            Ok(_) => Ok(record),
            Err(e) if e.is_not_found() => Err(blob_missing(record)),
            Err(e) => Err(DocumentError::Storage(e)),
        }
    }

    /// Get a document record together with a stream over its blob.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get`]. A blob deleted between the record read and the
    /// blob open is reported as `BlobMissing`.
    pub async fn read(&self, id: &DocumentId) -> Result<DocumentContent, DocumentError> {
        let record = self.load_record(id).await?;

        match self.blobs.get(&record.stored_name).await {
            Ok(blob) => Ok(DocumentContent { record, blob }),
            Err(e) if e.is_not_found() => Err(blob_missing(record)),
            Err(e) => Err(DocumentError::Storage(e)),
        }
    }

    /// List every visible document, newest first.
    ///
    /// Unreadable records and records whose blob is gone are skipped and
    /// logged. Records with identical timestamps come in no particular order.
    ///
    /// # Errors
    ///
    /// Returns `Storage` only if the metadata area itself cannot be scanned.
    pub async fn list(&self) -> Result<Vec<DocumentRecord>, DocumentError> {
        let candidates = self
            .records
            .list_all()
            .await
            .map_err(DocumentError::Storage)?;

        let mut visible = Vec::with_capacity(candidates.len());
        for record in candidates {
            match self.blobs.stat(&record.stored_name).await {
                Ok(_) => visible.push(record),
                Err(e) if e.is_not_found() => report_blob_missing(&record),
                Err(e) => {
                    warn!(id = %record.id, error = %e, "Skipping document whose blob cannot be checked");
                }
            }
        }

        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(visible)
    }

    /// Delete a document: blob first, record last.
    ///
    /// Returns the record that was removed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no record exists (including a second delete of
    /// the same id), `CorruptRecord` if the record cannot be parsed, and
    /// `Write` if either removal fails.
    pub async fn delete(&self, id: &DocumentId) -> Result<DocumentRecord, DocumentError> {
        let record = self.load_record(id).await?;

        self.blobs
            .delete(&record.stored_name)
            .await
            .map_err(DocumentError::Write)?;
        self.records
            .delete(&record.id)
            .await
            .map_err(DocumentError::Write)?;

        info!(id = %record.id, stored_name = %record.stored_name, "Document deleted");
        Ok(record)
    }

    async fn load_record(&self, id: &DocumentId) -> Result<DocumentRecord, DocumentError> {
        match self.records.get(id).await {
            Ok(record) => Ok(record),
            Err(StorageError::NotFound { .. }) => Err(DocumentError::not_found(id)),
            Err(StorageError::Corrupt { key, reason }) => {
                report_corrupt_record(&key, &reason);
                Err(DocumentError::CorruptRecord {
                    id: id.clone(),
                    reason,
                })
            }
            Err(e) => Err(DocumentError::Storage(e)),
        }
    }
}

fn report_blob_missing(record: &DocumentRecord) {
    error!(
        anomaly = "blob_missing",
        id = %record.id,
        stored_name = %record.stored_name,
        "Document record has no blob"
    );
}

/// Log a dangling record and build the matching error.
fn blob_missing(record: DocumentRecord) -> DocumentError {
    report_blob_missing(&record);
    DocumentError::BlobMissing {
        id: record.id,
        stored_name: record.stored_name,
    }
}
