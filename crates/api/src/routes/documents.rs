//! Document upload, listing, download, and deletion routes.

use axum::{
    Json, Router,
    body::Body,
    extract::{Multipart, Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use bytes::Bytes;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use tracing::{debug, info};

use docstore_core::document::{DocumentId, DocumentRecord};

use crate::AppState;
use crate::error::ApiError;

/// Multipart field carrying the uploaded file.
pub const FILE_FIELD: &str = "document";

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Bytes left unescaped in an RFC 8187 `filename*` value (`attr-char`).
const ATTR_CHAR_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// Creates the document routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/upload", post(upload))
        .route("/api/files", get(list_files))
        .route("/api/files/{file_id}", delete(delete_file))
        .route("/api/download/{file_id}", get(download))
}

// ============================================================================
// Response Types
// ============================================================================

/// Response for a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Confirmation message.
    pub message: &'static str,
    /// The stored document.
    pub file: DocumentRecord,
}

/// Response for the document listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListResponse {
    /// Documents, newest first.
    pub files: Vec<DocumentRecord>,
    /// Number of documents listed.
    pub total_files: usize,
    /// Shared filesystem mount path.
    pub storage_path: String,
}

/// Response for a successful deletion.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    /// Confirmation message.
    pub message: &'static str,
    /// Identifier of the deleted document.
    pub file_id: DocumentId,
}

/// One uploaded file pulled out of a multipart body.
struct UploadedFile {
    file_name: String,
    content_type: String,
    bytes: Bytes,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parse a client-supplied identifier. Malformed ids cannot name a document.
fn parse_id(raw: &str) -> Result<DocumentId, ApiError> {
    DocumentId::parse(raw).map_err(|e| {
        debug!(error = %e, "Rejecting malformed document id");
        ApiError::not_found("File not found")
    })
}

/// Read multipart fields until the file field is found.
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<UploadedFile>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            debug!(field = ?field.name(), "Ignoring multipart field");
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field
            .content_type()
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string();
        let bytes = field.bytes().await?;

        return Ok(Some(UploadedFile {
            file_name,
            content_type,
            bytes,
        }));
    }
    Ok(None)
}

/// `Content-Disposition` value that forces a download under `file_name`.
///
/// The quoted `filename` is an ASCII rendering with quotes, backslashes and
/// control characters replaced; `filename*` carries the exact UTF-8 name.
fn attachment_disposition(file_name: &str) -> HeaderValue {
    let ascii: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let mut value = format!("attachment; filename=\"{ascii}\"");
    if ascii != file_name {
        value.push_str("; filename*=UTF-8''");
        value.extend(utf8_percent_encode(file_name, ATTR_CHAR_SET));
    }

    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/api/upload`
/// Store one file from the `document` multipart field.
async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let Some(file) = read_file_field(&mut multipart).await? else {
        return Err(ApiError::validation("No file uploaded"));
    };

    let record = state
        .documents
        .create(file.bytes, &file.file_name, &file.content_type)
        .await?;

    info!(id = %record.id, original_name = %record.original_name, "File uploaded");

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "File uploaded successfully",
            file: record,
        }),
    ))
}

/// GET `/api/files`
/// List every document, newest first.
async fn list_files(State(state): State<AppState>) -> Result<Json<FileListResponse>, ApiError> {
    let files = state.documents.list().await?;

    Ok(Json(FileListResponse {
        total_files: files.len(),
        files,
        storage_path: state.storage.mount_path.display().to_string(),
    }))
}

/// GET `/api/download/{file_id}`
/// Stream the document bytes as an attachment.
async fn download(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&file_id)?;
    let content = state.documents.read(&id).await?;

    let content_type = HeaderValue::from_str(&content.record.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static(FALLBACK_CONTENT_TYPE));
    let disposition = attachment_disposition(&content.record.original_name);

    let size_bytes = content.blob.size_bytes();

    debug!(id = %id, size_bytes, "Streaming document");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CONTENT_LENGTH, HeaderValue::from(size_bytes)),
        ],
        Body::from_stream(content.blob),
    )
        .into_response())
}

/// DELETE `/api/files/{file_id}`
/// Remove a document's blob and record.
async fn delete_file(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = parse_id(&file_id)?;
    let record = state.documents.delete(&id).await?;

    Ok(Json(DeleteResponse {
        message: "File deleted successfully",
        file_id: record.id,
    }))
}
