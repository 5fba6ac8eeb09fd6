//! API route definitions.

use axum::Router;

use crate::AppState;
use crate::error::ApiError;

pub mod documents;
pub mod health;
pub mod storage;

/// Creates the router with every API route.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(documents::routes())
        .merge(storage::routes())
}

/// Fallback for paths no route or static file matches.
pub async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
