//! Catalog forwarding handlers
//!
//! One generic handler set covers songs, artists and albums: the gateway
//! checks the entity name and relays the call to the catalog service
//! with the query string and body untouched.

use axum::extract::{Path, RawQuery, State};
use axum::Json;
use reqwest::Method;
use serde_json::Value;

use crate::upstream::{GatewayError, Relay};
use crate::AppState;

/// Entities the catalog serves; anything else is not a route
fn check_entity(entity: &str) -> Result<(), GatewayError> {
    match entity {
        "songs" | "artists" | "albums" => Ok(()),
        _ => Err(GatewayError::UnknownRoute(format!("/api/{entity}"))),
    }
}

fn with_query(path: String, query: Option<String>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("{path}?{q}"),
        _ => path,
    }
}

/// GET /api/:entity
pub async fn list(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Relay, GatewayError> {
    check_entity(&entity)?;
    state
        .catalog
        .get(&with_query(format!("/api/{entity}"), query))
        .await
}

/// GET /api/:entity/search
pub async fn search(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Relay, GatewayError> {
    check_entity(&entity)?;
    state
        .catalog
        .get(&with_query(format!("/api/{entity}/search"), query))
        .await
}

/// GET /api/:entity/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((entity, id)): Path<(String, String)>,
) -> Result<Relay, GatewayError> {
    check_entity(&entity)?;
    state.catalog.get(&format!("/api/{entity}/{id}")).await
}

/// POST /api/:entity
pub async fn create(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Json(body): Json<Value>,
) -> Result<Relay, GatewayError> {
    check_entity(&entity)?;
    state
        .catalog
        .send_json(Method::POST, &format!("/api/{entity}"), body)
        .await
}

/// PUT /api/:entity/:id
pub async fn update(
    State(state): State<AppState>,
    Path((entity, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Relay, GatewayError> {
    check_entity(&entity)?;
    state
        .catalog
        .send_json(Method::PUT, &format!("/api/{entity}/{id}"), body)
        .await
}

/// DELETE /api/:entity/:id
pub async fn delete(
    State(state): State<AppState>,
    Path((entity, id)): Path<(String, String)>,
) -> Result<Relay, GatewayError> {
    check_entity(&entity)?;
    state.catalog.delete(&format!("/api/{entity}/{id}")).await
}
