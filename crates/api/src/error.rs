//! Error to HTTP response mapping.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, warn};

use docstore_core::document::DocumentError;
use docstore_core::storage::StorageError;
use docstore_shared::AppError;

/// Message returned for every server-side failure.
const GENERIC_FAILURE: &str = "Storage operation failed";

/// Handler error: an [`AppError`] rendered as `{"error": CODE, "message": ...}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self(AppError::NotFound(message.into()))
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        let app = match &err {
            // Integrity anomalies are logged by the service and look like
            // plain absence to clients
            DocumentError::NotFound(_)
            | DocumentError::BlobMissing { .. }
            | DocumentError::CorruptRecord { .. } => {
                AppError::NotFound("File not found".to_string())
            }
            DocumentError::UnsupportedType { .. } => AppError::UnsupportedMediaType(
                "Invalid file type. Only images, PDFs, Word documents, text files, and ZIP archives are allowed."
                    .to_string(),
            ),
            DocumentError::TooLarge { max, .. } => {
                AppError::PayloadTooLarge(format!("File exceeds the {max} byte limit"))
            }
            DocumentError::Write(_) | DocumentError::Storage(_) => {
                error!(error = %err, "Document operation failed");
                AppError::Storage(err.to_string())
            }
        };
        Self(app)
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        error!(error = %err, "Storage operation failed");
        Self(AppError::Storage(err.to_string()))
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        warn!(error = %err, "Multipart parsing error");
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self(AppError::PayloadTooLarge(err.body_text()))
        } else {
            Self::validation(err.body_text())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = if self.0.is_client_error() {
            self.0.message()
        } else {
            GENERIC_FAILURE
        };

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": message,
            })),
        )
            .into_response()
    }
}
