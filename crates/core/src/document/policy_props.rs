//! Property-based tests for upload admission and identifiers.

use proptest::prelude::*;

use crate::document::error::DocumentError;
use crate::document::id::{DocumentId, StoredName};
use crate::document::policy::UploadPolicy;

/// Strategy for extensions that no default family lists.
fn arb_unlisted_extension() -> impl Strategy<Value = String> {
    "[a-z]{2,5}".prop_filter("listed extension", |ext| {
        !["jpg", "jpeg", "png", "pdf", "doc", "docx", "txt", "zip"].contains(&ext.as_str())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Sizes above the limit are rejected, sizes at or below pass the size check.
    #[test]
    fn prop_size_limit(
        max_size in 1024u64..10_000_000,
        size in 0u64..20_000_000,
    ) {
        let policy = UploadPolicy::new().with_max_file_size(max_size);
        let result = policy.check("report.pdf", "application/pdf", size);

        if size <= max_size {
            prop_assert!(result.is_ok());
        } else {
            let is_too_large = matches!(result, Err(DocumentError::TooLarge { .. }));
            prop_assert!(is_too_large);
        }
    }

    /// Unlisted extensions are rejected whatever MIME type is declared.
    #[test]
    fn prop_unlisted_extension_rejected(
        stem in "[a-zA-Z0-9_-]{1,20}",
        ext in arb_unlisted_extension(),
        mime in prop_oneof![
            Just("application/pdf"),
            Just("image/png"),
            Just("text/plain"),
            Just("application/x-msdownload"),
        ],
    ) {
        let policy = UploadPolicy::new();
        let result = policy.check(&format!("{stem}.{ext}"), mime, 10);
        let is_unsupported = matches!(result, Err(DocumentError::UnsupportedType { .. }));
        prop_assert!(is_unsupported);
    }

    /// Generated stored names always parse and yield a valid document id.
    #[test]
    fn prop_generated_names_are_valid(original in ".{0,64}") {
        let stored = StoredName::generate(&original);
        prop_assert!(StoredName::parse(stored.as_str()).is_ok());

        let id = stored.document_id();
        prop_assert!(DocumentId::parse(id.as_str()).is_ok());
        prop_assert!(stored.as_str().starts_with(id.as_str()));
    }

    /// Client-supplied ids never contain path separators or dots.
    #[test]
    fn prop_parsed_ids_are_path_safe(raw in ".{0,64}") {
        if let Ok(id) = DocumentId::parse(&raw) {
            prop_assert!(!id.as_str().contains('/'));
            prop_assert!(!id.as_str().contains('\\'));
            prop_assert!(!id.as_str().contains('.'));
        }
    }
}
