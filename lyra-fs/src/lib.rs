//! lyra-fs library - File storage service
//!
//! Receives multipart uploads, validates them, and stores objects in an
//! S3-compatible bucket.

use axum::extract::DefaultBodyLimit;
use axum::Router;

pub mod api;
pub mod store;
pub mod validate;

use store::ObjectStore;

/// Headroom over the file-size limit for multipart framing overhead
const BODY_LIMIT_SLACK: usize = 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub store: ObjectStore,
}

impl AppState {
    pub fn new(store: ObjectStore) -> Self {
        Self { store }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{delete, post};
    use tower_http::trace::TraceLayer;

    Router::new()
        .route("/api/upload", post(api::upload::upload))
        .route("/api/upload/:key", delete(api::upload::delete))
        .merge(api::health::health_routes())
        .layer(DefaultBodyLimit::max(
            validate::MAX_UPLOAD_BYTES + BODY_LIMIT_SLACK,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
