//! lyra-ca library - Catalog service
//!
//! CRUD and search over the songs/artists/albums catalog, backed by the
//! shared SQLite database.

use axum::Router;
use sqlx::SqlitePool;

pub mod api;
pub mod db;
pub mod seed;
pub mod validate;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;
    use tower_http::trace::TraceLayer;

    Router::new()
        .route("/api/songs", get(api::songs::list).post(api::songs::create))
        .route("/api/songs/search", get(api::songs::search))
        .route(
            "/api/songs/:id",
            get(api::songs::get_by_id)
                .put(api::songs::update)
                .delete(api::songs::delete),
        )
        .route(
            "/api/artists",
            get(api::artists::list).post(api::artists::create),
        )
        .route("/api/artists/search", get(api::artists::search))
        .route(
            "/api/artists/:id",
            get(api::artists::get_by_id)
                .put(api::artists::update)
                .delete(api::artists::delete),
        )
        .route(
            "/api/albums",
            get(api::albums::list).post(api::albums::create),
        )
        .route("/api/albums/search", get(api::albums::search))
        .route(
            "/api/albums/:id",
            get(api::albums::get_by_id)
                .put(api::albums::update)
                .delete(api::albums::delete),
        )
        .merge(api::health::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
