//! Metadata store: one JSON record per document, named `<id>.json`.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use opendal::Operator;
use tracing::{error, warn};

use super::config::fs_operator;
use super::error::StorageError;
use crate::document::{DocumentId, DocumentRecord, RecordStore};

/// File suffix of record files.
pub const RECORD_SUFFIX: &str = ".json";

/// Log a record file that exists but cannot be used.
pub(crate) fn report_corrupt_record(key: &str, reason: &dyn Display) {
    error!(
        anomaly = "corrupt_record",
        key,
        reason = %reason,
        "Document record exists but cannot be parsed"
    );
}

/// JSON record storage for one metadata area of the shared filesystem.
///
/// There is no in-memory cache: every call re-reads or rewrites the shared
/// filesystem, so each process sees what any other process last wrote.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    operator: Operator,
    root: PathBuf,
}

impl MetadataStore {
    /// Open the metadata area rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the filesystem service cannot be initialized.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        let operator = fs_operator(&root)?;
        Ok(Self { operator, root })
    }

    /// Root directory of the metadata area.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_key(id: &DocumentId) -> String {
        format!("{id}{RECORD_SUFFIX}")
    }

    async fn read_record(&self, key: &str) -> Result<DocumentRecord, StorageError> {
        let buffer = self
            .operator
            .read(key)
            .await
            .map_err(|e| StorageError::at(key, &e))?;

        serde_json::from_slice(&buffer.to_vec()).map_err(|e| StorageError::corrupt(key, e))
    }
}

impl RecordStore for MetadataStore {
    async fn put(&self, record: &DocumentRecord) -> Result<(), StorageError> {
        let key = Self::record_key(&record.id);
        let json = serde_json::to_vec_pretty(record)
            .map_err(|e| StorageError::operation(format!("{key}: {e}")))?;

        self.operator
            .write(&key, json)
            .await
            .map(|_| ())
            .map_err(|e| StorageError::at(&key, &e))
    }

    async fn get(&self, id: &DocumentId) -> Result<DocumentRecord, StorageError> {
        let key = Self::record_key(id);
        let record = self.read_record(&key).await?;

        if &record.id != id {
            return Err(StorageError::corrupt(
                key,
                format!("record carries id {}", record.id),
            ));
        }
        Ok(record)
    }

    async fn delete(&self, id: &DocumentId) -> Result<(), StorageError> {
        let key = Self::record_key(id);
        match self.operator.delete(&key).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == opendal::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::at(&key, &e)),
        }
    }

    async fn list_all(&self) -> Result<Vec<DocumentRecord>, StorageError> {
        let entries = self
            .operator
            .list("/")
            .await
            .map_err(|e| StorageError::at("/", &e))?;

        let mut records = Vec::with_capacity(entries.len());
        for entry in entries {
            if !entry.metadata().is_file() {
                continue;
            }
            let Some(stem) = entry.name().strip_suffix(RECORD_SUFFIX) else {
                continue;
            };
            let Ok(id) = DocumentId::parse(stem) else {
                continue;
            };

            // One bad entry must not take the whole listing down
            match self.read_record(entry.path()).await {
                Ok(record) if record.id == id => records.push(record),
                Ok(record) => report_corrupt_record(
                    entry.path(),
                    &format!("record carries id {}", record.id),
                ),
                Err(StorageError::Corrupt { key, reason }) => report_corrupt_record(&key, &reason),
                Err(e) if e.is_not_found() => {
                    // Deleted between the scan and the read
                }
                Err(e) => warn!(key = %entry.path(), error = %e, "Skipping unreadable metadata record"),
            }
        }

        Ok(records)
    }
}
