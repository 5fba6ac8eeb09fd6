//! Allow-list entries for uploadable file families.
//!
//! A family pairs the file extensions it may be stored under with the MIME
//! types an uploader may declare for it. An upload is accepted only when its
//! extension and its declared MIME type belong to the same family.

use serde::{Deserialize, Serialize};

/// One allowed file family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTypeRule {
    /// Family name, used in logs and error messages.
    pub name: String,
    /// Lower-case extensions without the leading dot.
    pub extensions: Vec<String>,
    /// Lower-case MIME types without parameters.
    pub mime_types: Vec<String>,
}

impl FileTypeRule {
    /// Create a rule from borrowed parts.
    #[must_use]
    pub fn new(name: &str, extensions: &[&str], mime_types: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            extensions: extensions.iter().map(|e| e.to_ascii_lowercase()).collect(),
            mime_types: mime_types.iter().map(|m| m.to_ascii_lowercase()).collect(),
        }
    }

    /// Check whether this family lists the extension (case-insensitive, no dot).
    #[must_use]
    pub fn matches_extension(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }

    /// Check whether this family lists the MIME type (case-insensitive, no parameters).
    #[must_use]
    pub fn matches_mime_type(&self, mime_type: &str) -> bool {
        self.mime_types
            .iter()
            .any(|m| m.eq_ignore_ascii_case(mime_type))
    }

    /// Default families: images, PDFs, Word documents, plain text, and zip archives.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("image", &["jpg", "jpeg", "png"], &["image/jpeg", "image/png"]),
            Self::new("pdf", &["pdf"], &["application/pdf"]),
            Self::new(
                "word",
                &["doc", "docx"],
                &[
                    "application/msword",
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                ],
            ),
            Self::new("text", &["txt"], &["text/plain"]),
            Self::new(
                "archive",
                &["zip"],
                &["application/zip", "application/x-zip-compressed"],
            ),
        ]
    }
}
