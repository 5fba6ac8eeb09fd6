//! Opaque identifiers for stored documents.
//!
//! A [`StoredName`] is the on-disk key of a blob. It is generated from the
//! current time in nanoseconds plus a random component, so independent
//! processes sharing one filesystem never need a shared counter to avoid
//! collisions. The [`DocumentId`] is the stored name without its extension
//! and doubles as the metadata file name.

use std::fmt;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix of every generated stored name.
pub const STORED_NAME_PREFIX: &str = "document";

/// Longest accepted identifier.
const MAX_IDENTIFIER_LEN: usize = 128;

/// Longest extension carried over into a stored name.
const MAX_EXTENSION_LEN: usize = 16;

/// Rejected identifier text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid identifier: {0:?}")]
pub struct InvalidIdentifier(pub String);

/// Identifier of one document record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    /// Parse an identifier supplied by a client or read from disk.
    ///
    /// Accepts 1-128 characters of `[A-Za-z0-9_-]`, which rules out path
    /// separators and dot segments.
    pub fn parse(s: &str) -> Result<Self, InvalidIdentifier> {
        let valid = !s.is_empty()
            && s.len() <= MAX_IDENTIFIER_LEN
            && s
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidIdentifier(s.to_string()))
        }
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DocumentId {
    type Error = InvalidIdentifier;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

/// Server-generated blob file name, including the original extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StoredName(String);

impl StoredName {
    /// Generate a fresh name for an upload called `original_name`.
    ///
    /// Format: `document-{unix_nanos}-{random:010}{.ext}`. Only the lower-cased
    /// alphanumeric extension of the original name is kept.
    #[must_use]
    pub fn generate(original_name: &str) -> Self {
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let random: u32 = rand::random();
        let extension = extension_of(original_name)
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();

        Self(format!("{STORED_NAME_PREFIX}-{nanos}-{random:010}{extension}"))
    }

    /// Parse a stored name read from a record or a directory listing.
    ///
    /// Looser than [`Self::generate`]: earlier deployments kept the raw
    /// extension, so names such as `document-1-2.pdf (1)` exist on disk. Only
    /// names that could leave the storage area or hide as dotfiles are
    /// rejected.
    pub fn parse(s: &str) -> Result<Self, InvalidIdentifier> {
        let valid = !s.is_empty()
            && s.len() <= MAX_IDENTIFIER_LEN
            && !s.starts_with('.')
            && !s.contains("..")
            && !s.chars().any(|c| matches!(c, '/' | '\\') || c.is_control());

        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidIdentifier(s.to_string()))
        }
    }

    /// Derive the document identifier by stripping the extension.
    #[must_use]
    pub fn document_id(&self) -> DocumentId {
        let stem = match self.0.rfind('.') {
            Some(idx) => &self.0[..idx],
            None => &self.0,
        };
        // Stem is non-empty: a valid stored name never starts with '.'.
        let id = stem
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        DocumentId(id)
    }

    /// Borrow the name text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoredName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for StoredName {
    type Error = InvalidIdentifier;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StoredName> for String {
    fn from(name: StoredName) -> Self {
        name.0
    }
}

/// Lower-cased extension of a client-supplied file name, if it is alphanumeric.
#[must_use]
pub fn extension_of(file_name: &str) -> Option<String> {
    // Clients may send Windows paths; only the last component matters.
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    Path::new(base)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(str::to_ascii_lowercase)
}
