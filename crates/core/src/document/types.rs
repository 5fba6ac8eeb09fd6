//! Document types and data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{DocumentId, StoredName};
use crate::storage::BlobStream;

/// Metadata record paired 1:1 with a stored blob.
///
/// Records are immutable once written. Field aliases accept records written
/// by earlier deployments (`filename`, `size`, `mimetype`, `uploadDate`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    /// Stable identifier, derived from the stored name.
    pub id: DocumentId,
    /// File name supplied by the uploader. Display only.
    pub original_name: String,
    /// On-disk key of the blob.
    #[serde(alias = "filename")]
    pub stored_name: StoredName,
    /// Blob length observed at write time.
    #[serde(alias = "size")]
    pub size_bytes: u64,
    /// MIME type declared by the uploader.
    #[serde(alias = "mimetype")]
    pub content_type: String,
    /// Creation timestamp.
    #[serde(alias = "uploadDate")]
    pub created_at: DateTime<Utc>,
}

/// A record together with its opened blob, as served for download.
#[derive(Debug)]
pub struct DocumentContent {
    /// Metadata record.
    pub record: DocumentRecord,
    /// Blob bytes, not yet read.
    pub blob: BlobStream,
}
