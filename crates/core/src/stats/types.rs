//! Storage statistics types.

use serde::Serialize;

const BYTES_PER_MIB: u64 = 1024 * 1024;

/// Aggregate view of the blob area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStats {
    /// Number of blobs present.
    pub file_count: u64,
    /// Sum of blob sizes in bytes.
    pub total_bytes: u64,
}

impl StorageStats {
    /// Add one blob of `size` bytes.
    pub fn record(&mut self, size: u64) {
        self.file_count += 1;
        self.total_bytes = self.total_bytes.saturating_add(size);
    }

    /// Total size in mebibytes with two decimals, e.g. `"1.50 MB"`.
    ///
    /// Rounds half up to the nearest hundredth.
    #[must_use]
    pub fn formatted_size(&self) -> String {
        let hundredths = (u128::from(self.total_bytes) * 100 + u128::from(BYTES_PER_MIB / 2))
            / u128::from(BYTES_PER_MIB);
        format!("{}.{:02} MB", hundredths / 100, hundredths % 100)
    }
}
