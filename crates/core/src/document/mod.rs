//! Document record management.
//!
//! This module ties blobs to their metadata records:
//! - Upload admission (size limit, file family allow-list)
//! - Identifier generation and validation
//! - Create, get, read, list, and delete
//! - Integrity anomaly detection (dangling and corrupt records)

mod error;
mod id;
mod policy;
mod service;
mod types;

#[cfg(test)]
mod policy_props;

pub use error::DocumentError;
pub use id::{DocumentId, InvalidIdentifier, STORED_NAME_PREFIX, StoredName, extension_of};
pub use policy::UploadPolicy;
pub use service::{DocumentService, RecordStore};
pub use types::{DocumentContent, DocumentRecord};
