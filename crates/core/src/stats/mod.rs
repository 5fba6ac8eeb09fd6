//! Storage accounting.
//!
//! Aggregates are computed from a fresh scan of the blob area on every call.
//! Orphan blobs are counted: they occupy space even though no listing shows
//! them.

mod service;
mod types;

pub use service::StorageAccountant;
pub use types::StorageStats;
