//! lyra-pl library - Player service
//!
//! Hosts the playback state machine and the audio backend, exposing
//! transport control over HTTP and state changes over SSE.

use axum::Router;
use lyra_common::events::PlayerEvent;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, Mutex};

pub mod api;
pub mod backend;
pub mod player;
pub mod sse;

use backend::{AudioBackend, BackendEvent};
use player::Player;

/// The player behind its lock; handlers and the event pump are the only
/// two paths in
pub type SharedPlayer = Arc<Mutex<Player>>;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub player: SharedPlayer,
    pub events: broadcast::Sender<PlayerEvent>,
}

impl AppState {
    /// Wire up the player with the given backend and spawn the pump task
    /// draining backend events into it.
    pub fn new(
        backend: Box<dyn AudioBackend>,
        events: broadcast::Sender<PlayerEvent>,
        mut backend_rx: mpsc::UnboundedReceiver<BackendEvent>,
    ) -> Self {
        let player = Arc::new(Mutex::new(Player::new(backend, events.clone())));

        let pump_player = player.clone();
        tokio::spawn(async move {
            while let Some(event) = backend_rx.recv().await {
                pump_player.lock().await.handle_backend_event(event);
            }
        });

        Self { player, events }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post, put};
    use tower_http::cors::CorsLayer;
    use tower_http::trace::TraceLayer;

    Router::new()
        .route("/playback/state", get(api::get_state))
        .route("/playback/play", post(api::play))
        .route("/playback/toggle", post(api::toggle))
        .route("/playback/next", post(api::next))
        .route("/playback/previous", post(api::previous))
        .route("/playback/seek", post(api::seek))
        .route("/playback/volume", post(api::volume))
        .route("/playback/playlist", put(api::set_playlist))
        .route("/events", get(api::event_stream))
        .merge(api::health::health_routes())
        // The web UI is served from the gateway's origin
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
