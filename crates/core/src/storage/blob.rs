//! Blob store: raw document bytes addressed by generated stored name.

use std::fmt;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Bytes, BytesMut};
use futures::stream::{BoxStream, Stream, StreamExt, TryStreamExt};
use opendal::Operator;
use tracing::debug;

use super::config::fs_operator;
use super::error::StorageError;
use crate::document::StoredName;

/// Size of each chunk read from a streamed blob.
pub const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Bytes of one blob, read from the filesystem chunk by chunk.
pub struct BlobStream {
    size_bytes: u64,
    inner: BoxStream<'static, Result<Bytes, StorageError>>,
}

impl BlobStream {
    /// Blob length observed when the stream was opened.
    #[must_use]
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Drain the stream into one buffer.
    ///
    /// # Errors
    ///
    /// Returns the first read error.
    pub async fn read_to_end(self) -> Result<Bytes, StorageError> {
        let capacity = usize::try_from(self.size_bytes).unwrap_or_default();
        let buf = self
            .inner
            .try_fold(BytesMut::with_capacity(capacity), |mut buf, chunk| async move {
                buf.extend_from_slice(&chunk);
                Ok::<_, StorageError>(buf)
            })
            .await?;
        Ok(buf.freeze())
    }
}

impl Stream for BlobStream {
    type Item = Result<Bytes, StorageError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl fmt::Debug for BlobStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlobStream")
            .field("size_bytes", &self.size_bytes)
            .finish_non_exhaustive()
    }
}

/// Durable byte storage for one blob area of the shared filesystem.
///
/// Every call goes to the filesystem; nothing is cached in-process.
#[derive(Debug, Clone)]
pub struct BlobStore {
    operator: Operator,
    root: PathBuf,
}

impl BlobStore {
    /// Open the blob area rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the filesystem service cannot be initialized.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        let operator = fs_operator(&root)?;
        Ok(Self { operator, root })
    }

    /// Root directory of the blob area.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` under a freshly generated name and return that name.
    ///
    /// The write has completed when this returns.
    ///
    /// # Errors
    ///
    /// Returns `Operation` on I/O failure (disk full, permission denied,
    /// mount unavailable).
    pub async fn put(&self, bytes: Bytes, original_name: &str) -> Result<StoredName, StorageError> {
        let name = StoredName::generate(original_name);
        let size = bytes.len();

        self.operator
            .write(name.as_str(), bytes)
            .await
            .map_err(|e| StorageError::at(name.as_str(), &e))?;

        debug!(stored_name = %name, size, "Blob written");
        Ok(name)
    }

    /// Open a blob for streaming.
    ///
    /// Absence is detected here, before any byte is sent. A read failure
    /// after that surfaces as an `Operation` error inside the stream.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no blob exists under `name`.
    pub async fn get(&self, name: &StoredName) -> Result<BlobStream, StorageError> {
        let size_bytes = self.stat(name).await?;
        let key = name.as_str();

        let reader = self
            .operator
            .reader_with(key)
            .chunk(READ_CHUNK_SIZE)
            .await
            .map_err(|e| StorageError::at(key, &e))?;
        let bytes = reader
            .into_bytes_stream(0..size_bytes)
            .await
            .map_err(|e| StorageError::at(key, &e))?;

        let key = key.to_string();
        let inner = bytes
            .map_err(move |e| StorageError::operation(format!("{key}: {e}")))
            .boxed();

        Ok(BlobStream { size_bytes, inner })
    }

    /// Delete a blob. Deleting a missing blob is not an error.
    ///
    /// # Errors
    ///
    /// Returns `Operation` if the filesystem refuses the deletion.
    pub async fn delete(&self, name: &StoredName) -> Result<(), StorageError> {
        match self.operator.delete(name.as_str()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == opendal::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::at(name.as_str(), &e)),
        }
    }

    /// Enumerate every blob currently present.
    ///
    /// This is a full directory scan, not an index lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob area itself cannot be listed.
    pub async fn list(&self) -> Result<Vec<StoredName>, StorageError> {
        let entries = self
            .operator
            .list("/")
            .await
            .map_err(|e| StorageError::at("/", &e))?;

        Ok(entries
            .into_iter()
            .filter(|entry| entry.metadata().is_file())
            // Skips NFS silly-rename files (.nfsXXXX) and other dotfiles
            .filter_map(|entry| match StoredName::parse(entry.name()) {
                Ok(name) => Some(name),
                Err(e) => {
                    debug!(error = %e, "Ignoring foreign entry in blob area");
                    None
                }
            })
            .collect())
    }

    /// Size in bytes of a stored blob.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no blob exists under `name`.
    pub async fn stat(&self, name: &StoredName) -> Result<u64, StorageError> {
        let meta = self
            .operator
            .stat(name.as_str())
            .await
            .map_err(|e| StorageError::at(name.as_str(), &e))?;

        Ok(meta.content_length())
    }

    /// Write raw bytes under an explicit name.
    #[cfg(test)]
    pub(crate) async fn put_named(&self, name: &StoredName, bytes: Bytes) -> Result<(), StorageError> {
        self.operator
            .write(name.as_str(), bytes)
            .await
            .map(|_| ())
            .map_err(|e| StorageError::at(name.as_str(), &e))
    }
}
