//! Storage configuration types.

use std::path::{Path, PathBuf};

use docstore_shared::config::StorageSettings;
use opendal::{Operator, services};
use tracing::info;

use super::error::StorageError;

/// Layout of the shared filesystem: one mount holding a blob area and a
/// metadata area.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Mount point of the shared filesystem.
    pub mount_path: PathBuf,
    /// Blob area directory name under the mount.
    pub blob_dir: String,
    /// Metadata area directory name under the mount.
    pub metadata_dir: String,
}

impl StorageConfig {
    /// Default blob area name.
    pub const DEFAULT_BLOB_DIR: &'static str = "uploads";
    /// Default metadata area name.
    pub const DEFAULT_METADATA_DIR: &'static str = "documents";

    /// Create a layout rooted at `mount_path` with default area names.
    #[must_use]
    pub fn new(mount_path: impl Into<PathBuf>) -> Self {
        Self {
            mount_path: mount_path.into(),
            blob_dir: Self::DEFAULT_BLOB_DIR.to_string(),
            metadata_dir: Self::DEFAULT_METADATA_DIR.to_string(),
        }
    }

    /// Build the layout from application settings.
    #[must_use]
    pub fn from_settings(settings: &StorageSettings) -> Self {
        Self {
            mount_path: settings.mount_path.clone(),
            blob_dir: settings.blob_dir.clone(),
            metadata_dir: settings.metadata_dir.clone(),
        }
    }

    /// Absolute path of the blob area.
    #[must_use]
    pub fn blob_root(&self) -> PathBuf {
        self.mount_path.join(&self.blob_dir)
    }

    /// Absolute path of the metadata area.
    #[must_use]
    pub fn metadata_root(&self) -> PathBuf {
        self.mount_path.join(&self.metadata_dir)
    }

    /// Create both storage areas if they are missing.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created (mount absent,
    /// permission denied).
    pub async fn ensure_areas(&self) -> Result<(), StorageError> {
        for dir in [self.blob_root(), self.metadata_root()] {
            tokio::fs::create_dir_all(&dir).await.map_err(|e| {
                StorageError::configuration(format!("cannot create {}: {e}", dir.display()))
            })?;
        }

        info!(
            blob_root = %self.blob_root().display(),
            metadata_root = %self.metadata_root().display(),
            "Storage areas initialized"
        );
        Ok(())
    }

    /// Check whether the mount point is currently reachable.
    pub async fn is_mounted(&self) -> bool {
        tokio::fs::metadata(&self.mount_path)
            .await
            .is_ok_and(|meta| meta.is_dir())
    }
}

/// Create an OpenDAL filesystem operator scoped to one storage area.
pub(crate) fn fs_operator(root: &Path) -> Result<Operator, StorageError> {
    let builder = services::Fs::default().root(
        root.to_str()
            .ok_or_else(|| StorageError::configuration("invalid path"))?,
    );

    Ok(Operator::new(builder)
        .map_err(|e| StorageError::configuration(e.to_string()))?
        .finish())
}
