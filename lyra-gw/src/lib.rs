//! lyra-gw library - Gateway service
//!
//! A thin procedure router in front of the catalog and storage services,
//! plus the embedded web UI. Handlers relay upstream status and JSON
//! bodies unchanged; the gateway adds no semantics of its own.

use axum::extract::DefaultBodyLimit;
use axum::Router;

pub mod api;
pub mod ui;
pub mod upstream;

use upstream::Upstream;

/// Uploads pass through the gateway; match the storage service's limit
/// plus framing slack
const BODY_LIMIT: usize = 51 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Upstream,
    pub storage: Upstream,
}

impl AppState {
    pub fn new(catalog_url: impl Into<String>, storage_url: impl Into<String>) -> Self {
        Self {
            catalog: Upstream::new("catalog", catalog_url),
            storage: Upstream::new("storage", storage_url),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};
    use tower_http::trace::TraceLayer;

    Router::new()
        // Static precedence: /api/upload wins over /api/:entity
        .route("/api/upload", post(api::upload::upload))
        .route("/api/upload/:key", axum::routing::delete(api::upload::delete))
        .route(
            "/api/:entity",
            get(api::catalog::list).post(api::catalog::create),
        )
        .route("/api/:entity/search", get(api::catalog::search))
        .route(
            "/api/:entity/:id",
            get(api::catalog::get_by_id)
                .put(api::catalog::update)
                .delete(api::catalog::delete),
        )
        .route("/", get(ui::serve_index))
        .route("/static/app.js", get(ui::serve_app_js))
        .merge(api::health::health_routes())
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
