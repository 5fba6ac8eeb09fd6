//! Storage accountant service.

use std::sync::Arc;

use tracing::{debug, warn};

use super::types::StorageStats;
use crate::storage::{BlobStore, StorageError};

/// Read-only aggregate view over the blob area.
#[derive(Debug, Clone)]
pub struct StorageAccountant {
    blobs: Arc<BlobStore>,
}

impl StorageAccountant {
    /// Create a new accountant.
    #[must_use]
    pub fn new(blobs: Arc<BlobStore>) -> Self {
        Self { blobs }
    }

    /// Count blobs and sum their sizes.
    ///
    /// A blob that disappears between the scan and its `stat` is skipped.
    ///
    /// # Errors
    ///
    /// Returns an error only if the blob area cannot be listed.
    pub async fn stats(&self) -> Result<StorageStats, StorageError> {
        let names = self.blobs.list().await?;

        let mut stats = StorageStats::default();
        for name in &names {
            match self.blobs.stat(name).await {
                Ok(size) => stats.record(size),
                Err(e) if e.is_not_found() => {
                    debug!(stored_name = %name, "Blob vanished during accounting scan");
                }
                Err(e) => {
                    warn!(stored_name = %name, error = %e, "Skipping blob that cannot be sized");
                }
            }
        }

        debug!(
            file_count = stats.file_count,
            total_bytes = stats.total_bytes,
            "Storage stats computed"
        );
        Ok(stats)
    }
}
