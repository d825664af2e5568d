//! Health check endpoint with upstream probes

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    pub upstreams: UpstreamHealth,
}

#[derive(Debug, Serialize)]
pub struct UpstreamHealth {
    pub catalog: &'static str,
    pub storage: &'static str,
}

/// GET /health
///
/// Reports the gateway's own liveness plus a quick probe of both
/// upstreams; the gateway itself stays "ok" even when they are down.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (catalog, storage) = tokio::join!(state.catalog.probe(), state.storage.probe());

    Json(HealthResponse {
        status: "ok".to_string(),
        module: "lyra-gw".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        upstreams: UpstreamHealth { catalog, storage },
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
