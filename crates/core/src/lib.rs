//! Core document storage logic for Docstore.
//!
//! This crate contains the storage engine with ZERO web dependencies.
//! Every operation goes straight to the shared filesystem, so any number of
//! processes can serve the same mount.
//!
//! # Modules
//!
//! - `storage` - Blob and metadata areas on the shared filesystem
//! - `document` - Document records, admission rules, and lifecycle
//! - `stats` - Storage accounting over the blob area

pub mod document;
pub mod stats;
pub mod storage;
