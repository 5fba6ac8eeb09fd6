//! Banner, health, and status endpoints.

use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

/// Service banner response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerResponse {
    /// Service description.
    pub message: &'static str,
    /// Current time (RFC 3339).
    pub timestamp: String,
    /// Service version.
    pub version: &'static str,
    /// Deployment environment.
    pub environment: String,
    /// Shared filesystem mount path.
    pub storage_path: String,
    /// Capabilities offered.
    pub features: [&'static str; 5],
}

/// Health check response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Seconds since the process started serving.
    pub uptime_secs: u64,
    /// Current time (RFC 3339).
    pub timestamp: String,
    /// `mounted` or `not mounted`.
    pub storage_status: &'static str,
    /// Shared filesystem mount path.
    pub storage_path: String,
}

/// Process status response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Always `running` when answered.
    pub server: &'static str,
    /// `available` or `unavailable`.
    pub storage: &'static str,
    /// Seconds since the process started serving.
    pub uptime_secs: u64,
    /// Operating system process id.
    pub pid: u32,
    /// Service version.
    pub version: &'static str,
}

/// Service banner handler.
async fn banner(State(state): State<AppState>) -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "Document store on shared filesystem storage",
        timestamp: Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
        environment: state.info.environment.clone(),
        storage_path: state.storage.mount_path.display().to_string(),
        features: [
            "File upload to shared storage",
            "Document metadata records",
            "File listing",
            "File download",
            "Shared storage across server instances",
        ],
    })
}

/// Health check handler.
///
/// Always answers 200; a missing mount shows up in `storageStatus`.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let mounted = state.storage.is_mounted().await;

    Json(HealthResponse {
        status: "healthy",
        uptime_secs: state.info.uptime_secs(),
        timestamp: Utc::now().to_rfc3339(),
        storage_status: if mounted { "mounted" } else { "not mounted" },
        storage_path: state.storage.mount_path.display().to_string(),
    })
}

/// Process status handler.
async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let mounted = state.storage.is_mounted().await;

    Json(StatusResponse {
        server: "running",
        storage: if mounted { "available" } else { "unavailable" },
        uptime_secs: state.info.uptime_secs(),
        pid: std::process::id(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Creates banner, health, and status routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health_check))
        .route("/api/status", get(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_router;
    use crate::test_support::{json_body, test_state};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        (status, json_body(response).await)
    }

    #[tokio::test]
    async fn test_banner() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let app = create_router(test_state(&tmp).await);

        let (status, json) = get_json(app, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["environment"], "test");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(json["features"].as_array().map(Vec::len), Some(5));
    }

    #[tokio::test]
    async fn test_health_reports_mounted_storage() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let app = create_router(test_state(&tmp).await);

        let (status, json) = get_json(app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["storageStatus"], "mounted");
        assert_eq!(json["storagePath"], tmp.path().display().to_string());
        assert!(json["uptimeSecs"].is_u64());
    }

    #[tokio::test]
    async fn test_health_reports_missing_mount() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let state = test_state(&tmp).await;
        let mount = tmp.path().to_path_buf();
        let app = create_router(state);
        std::fs::remove_dir_all(&mount).expect("unmount");

        let (status, json) = get_json(app.clone(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["storageStatus"], "not mounted");

        let (_, json) = get_json(app, "/api/status").await;
        assert_eq!(json["storage"], "unavailable");
    }

    #[tokio::test]
    async fn test_status() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let app = create_router(test_state(&tmp).await);

        let (status, json) = get_json(app, "/api/status").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["server"], "running");
        assert_eq!(json["storage"], "available");
        assert_eq!(json["pid"], std::process::id());
    }
}
