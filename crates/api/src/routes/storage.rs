//! Storage statistics route.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::AppState;
use crate::error::ApiError;

/// Storage statistics response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStatsResponse {
    /// Shared filesystem mount path.
    pub storage_path: String,
    /// Number of blobs, orphans included.
    pub total_files: u64,
    /// Sum of blob sizes in bytes.
    pub total_size: u64,
    /// Total size as `"<n.nn> MB"`.
    pub total_size_formatted: String,
}

/// GET `/api/storage/stats`
/// Fresh scan of the blob area.
async fn storage_stats(
    State(state): State<AppState>,
) -> Result<Json<StorageStatsResponse>, ApiError> {
    let stats = state.accountant.stats().await?;

    Ok(Json(StorageStatsResponse {
        storage_path: state.storage.mount_path.display().to_string(),
        total_files: stats.file_count,
        total_size: stats.total_bytes,
        total_size_formatted: stats.formatted_size(),
    }))
}

/// Creates the storage routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/storage/stats", get(storage_stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_router;
    use crate::test_support::{json_body, test_state};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn fetch_stats(app: Router) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/storage/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        (status, json_body(response).await)
    }

    #[tokio::test]
    async fn test_stats_empty() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let app = create_router(test_state(&tmp).await);

        let (status, json) = fetch_stats(app).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["totalFiles"], 0);
        assert_eq!(json["totalSize"], 0);
        assert_eq!(json["totalSizeFormatted"], "0.00 MB");
    }

    #[tokio::test]
    async fn test_stats_counts_blobs_without_records() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let state = test_state(&tmp).await;
        let blob_root = state.storage.blob_root();
        let app = create_router(state);

        for (name, size) in [
            ("document-1-0000000001.txt", 100),
            ("document-2-0000000002.pdf", 250),
            ("document-3-0000000003.png", 4096),
        ] {
            std::fs::write(blob_root.join(name), vec![0u8; size]).expect("write blob");
        }

        let (status, json) = fetch_stats(app).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["totalFiles"], 3);
        assert_eq!(json["totalSize"], 4446);
        assert_eq!(json["storagePath"], tmp.path().display().to_string());
    }
}
