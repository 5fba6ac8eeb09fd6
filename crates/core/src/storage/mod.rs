//! Shared filesystem storage areas, accessed through Apache OpenDAL.
//!
//! The mount holds two flat key spaces:
//! - the blob area (`uploads/`): raw bytes named by generated stored name
//! - the metadata area (`documents/`): one `<id>.json` record per document
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Shared filesystem mount                       │
//! ├────────────────────────────────┬────────────────────────────────┤
//! │ BlobStore (uploads/)           │ MetadataStore (documents/)     │
//! │ put / get / delete / list /    │ put / get / delete / list_all  │
//! │ stat                           │                                │
//! ├────────────────────────────────┴────────────────────────────────┤
//! │                 OpenDAL Fs operator per area                     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Neither store caches anything; neither relies on atomic rename or locks.

mod blob;
mod config;
mod error;
mod metadata;

pub use blob::{BlobStore, BlobStream, READ_CHUNK_SIZE};
pub use config::StorageConfig;
pub use error::StorageError;
pub use metadata::{MetadataStore, RECORD_SUFFIX};
pub(crate) use metadata::report_corrupt_record;
