//! Upload admission rules: size limit and file family allow-list.

use docstore_shared::FileTypeRule;
use mime::Mime;
use docstore_shared::config::StorageSettings;

use super::error::DocumentError;
use super::id::extension_of;

/// Admission rules applied before anything is written.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    max_file_size: u64,
    allowed_types: Vec<FileTypeRule>,
}

impl UploadPolicy {
    /// Default max file size: 10MB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

    /// Create a policy with the default allow-list and size limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            allowed_types: FileTypeRule::defaults(),
        }
    }

    /// Build the policy from application settings.
    #[must_use]
    pub fn from_settings(settings: &StorageSettings) -> Self {
        Self {
            max_file_size: settings.max_file_size,
            allowed_types: settings.allowed_types.clone(),
        }
    }

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Set allowed file families.
    #[must_use]
    pub fn with_allowed_types(mut self, types: Vec<FileTypeRule>) -> Self {
        self.allowed_types = types;
        self
    }

    /// Maximum upload size in bytes.
    #[must_use]
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Validate an upload against the size limit and the allow-list.
    ///
    /// The extension of `file_name` and the declared `content_type` must both
    /// belong to the same allowed family. Returns the matching family.
    ///
    /// # Errors
    ///
    /// Returns `TooLarge`, or `UnsupportedType` (also for a `content_type`
    /// that does not parse as a MIME type).
    pub fn check(
        &self,
        file_name: &str,
        content_type: &str,
        size: u64,
    ) -> Result<&FileTypeRule, DocumentError> {
        if size > self.max_file_size {
            return Err(DocumentError::too_large(size, self.max_file_size));
        }

        let unsupported = || DocumentError::unsupported_type(file_name, content_type);
        let mime: Mime = content_type.parse().map_err(|_| unsupported())?;
        let ext = extension_of(file_name).ok_or_else(unsupported)?;

        self.allowed_types
            .iter()
            .find(|rule| rule.matches_extension(&ext) && rule.matches_mime_type(mime.essence_str()))
            .ok_or_else(unsupported)
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("photo.jpg", "image/jpeg")]
    #[case("photo.jpeg", "image/jpeg")]
    #[case("scan.PNG", "image/png")]
    #[case("report.pdf", "application/pdf")]
    #[case("letter.doc", "application/msword")]
    #[case(
        "letter.docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    )]
    #[case("notes.txt", "text/plain; charset=utf-8")]
    #[case("notes.txt", "Text/Plain")]
    #[case("bundle.zip", "application/zip")]
    fn test_accepts_allowed(#[case] name: &str, #[case] mime: &str) {
        let policy = UploadPolicy::new();
        assert!(policy.check(name, mime, 1024).is_ok());
    }

    #[rstest]
    #[case("setup.exe", "application/x-msdownload")]
    #[case("report.pdf", "application/x-msdownload")]
    #[case("setup.exe", "application/pdf")]
    #[case("noext", "text/plain")]
    #[case("page.html", "text/html")]
    // Both allowed, but from different families
    #[case("photo.png", "application/pdf")]
    // Not a MIME type at all
    #[case("notes.txt", "text")]
    #[case("notes.txt", "")]
    fn test_rejects_unsupported(#[case] name: &str, #[case] mime: &str) {
        let policy = UploadPolicy::new();
        let err = policy.check(name, mime, 1024).unwrap_err();
        assert!(matches!(err, DocumentError::UnsupportedType { .. }));
    }

    #[test]
    fn test_rejects_too_large() {
        let policy = UploadPolicy::new().with_max_file_size(1024);
        assert!(policy.check("a.pdf", "application/pdf", 1024).is_ok());

        let err = policy.check("a.pdf", "application/pdf", 1025).unwrap_err();
        assert!(matches!(
            err,
            DocumentError::TooLarge {
                size: 1025,
                max: 1024
            }
        ));
    }

    #[test]
    fn test_custom_allow_list() {
        let policy = UploadPolicy::new()
            .with_allowed_types(vec![FileTypeRule::new("csv", &["csv"], &["text/csv"])]);
        assert!(policy.check("data.csv", "text/csv", 10).is_ok());
        assert!(policy.check("report.pdf", "application/pdf", 10).is_err());
    }

    #[test]
    fn test_returns_matching_family() {
        let policy = UploadPolicy::new();
        let rule = policy
            .check("bundle.zip", "application/x-zip-compressed", 10)
            .expect("allowed");
        assert_eq!(rule.name, "archive");
    }
}
