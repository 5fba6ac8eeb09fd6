//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for upload, listing, download, and deletion
//! - Health and status endpoints
//! - Error to response mapping
//! - Static file serving with a JSON 404 fallback

pub mod error;
pub mod routes;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::handler::HandlerWithoutStateExt;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;

use docstore_core::document::{DocumentService, UploadPolicy};
use docstore_core::stats::StorageAccountant;
use docstore_core::storage::{BlobStore, MetadataStore, StorageConfig, StorageError};
use docstore_shared::AppConfig;

/// Room for multipart boundaries and part headers on top of the file itself.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Process-level facts reported by the banner and status endpoints.
#[derive(Debug)]
pub struct ServiceInfo {
    /// Deployment environment name.
    pub environment: String,
    /// Directory served for unmatched paths.
    pub static_dir: PathBuf,
    /// When this process started serving.
    pub started_at: Instant,
}

impl ServiceInfo {
    /// Create service info, starting the uptime clock now.
    #[must_use]
    pub fn new(environment: impl Into<String>, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            environment: environment.into(),
            static_dir: static_dir.into(),
            started_at: Instant::now(),
        }
    }

    /// Whole seconds since start.
    #[must_use]
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Document record manager.
    pub documents: Arc<DocumentService>,
    /// Storage accountant.
    pub accountant: Arc<StorageAccountant>,
    /// Shared filesystem layout.
    pub storage: Arc<StorageConfig>,
    /// Process-level facts.
    pub info: Arc<ServiceInfo>,
}

impl AppState {
    /// Open both storage areas and wire the services together.
    ///
    /// Does not create any directory; see [`StorageConfig::ensure_areas`].
    ///
    /// # Errors
    ///
    /// Returns an error if a storage area cannot be opened.
    pub fn from_config(config: &AppConfig) -> Result<Self, StorageError> {
        let storage = StorageConfig::from_settings(&config.storage);
        let blobs = Arc::new(BlobStore::open(storage.blob_root())?);
        let records = Arc::new(MetadataStore::open(storage.metadata_root())?);

        let documents = DocumentService::new(
            blobs.clone(),
            records,
            UploadPolicy::from_settings(&config.storage),
        );

        Ok(Self {
            documents: Arc::new(documents),
            accountant: Arc::new(StorageAccountant::new(blobs)),
            storage: Arc::new(storage),
            info: Arc::new(ServiceInfo::new(
                config.environment.clone(),
                config.server.static_dir.clone(),
            )),
        })
    }

    /// Request body limit: the largest allowed file plus multipart overhead.
    #[must_use]
    pub fn body_limit(&self) -> usize {
        usize::try_from(self.documents.policy().max_file_size())
            .unwrap_or(usize::MAX)
            .saturating_add(MULTIPART_OVERHEAD_BYTES)
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let static_dir = state.info.static_dir.clone();

    let mut router = routes::api_routes();
    if static_dir.is_dir() {
        router = router.fallback_service(
            ServeDir::new(static_dir).not_found_service(routes::not_found.into_service()),
        );
    } else {
        warn!(
            path = %static_dir.display(),
            "Static directory not found, static files will not be served"
        );
        router = router.fallback(routes::not_found);
    }

    router
        .layer(DefaultBodyLimit::max(state.body_limit()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let app = create_router(test_state(&tmp).await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/nothing-here")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = json_body(response).await;
        assert_eq!(json["error"], "NOT_FOUND");
        assert_eq!(json["message"], "Route not found");
    }

    #[tokio::test]
    async fn test_serves_static_files() {
        let tmp = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(tmp.path().join("public")).expect("mkdir");
        std::fs::write(tmp.path().join("public/app.css"), "body {}").expect("write");
        let app = create_router(test_state(&tmp).await);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/app.css")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"body {}");

        let missing = app
            .oneshot(
                Request::builder()
                    .uri("/missing.js")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_body_limit_tracks_policy() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let state = test_state(&tmp).await;

        assert_eq!(
            state.body_limit(),
            10 * 1024 * 1024 + MULTIPART_OVERHEAD_BYTES
        );
    }
}
