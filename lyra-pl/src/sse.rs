//! SSE broadcasting of player events

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};
use lyra_common::events::PlayerEvent;
use std::convert::Infallible;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{info, warn};

/// Events buffered per SSE subscriber before lagging clients drop
pub const EVENT_BUFFER: usize = 100;

/// Create the player event broadcast channel
pub fn event_channel() -> broadcast::Sender<PlayerEvent> {
    let (tx, _) = broadcast::channel(EVENT_BUFFER);
    tx
}

/// Convert a broadcast subscription into an SSE stream.
///
/// Called by the HTTP handler when a client connects to /events.
pub fn subscribe_stream(
    tx: &broadcast::Sender<PlayerEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("New SSE client connected to player events");

    let rx = tx.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(player_event) => Event::default()
                .event(player_event.name())
                .json_data(&player_event)
                .ok()
                .map(Ok),
            Err(e) => {
                // Lagged receiver; skip the gap and keep streaming
                warn!("SSE client lagged: {:?}", e);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
