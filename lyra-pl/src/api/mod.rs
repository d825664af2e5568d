//! HTTP API handlers for lyra-pl
//!
//! Transport commands lock the player, apply the operation, and return
//! the resulting state snapshot so clients never need a follow-up read.

pub mod health;

use axum::{
    extract::State,
    response::sse::{Event, Sse},
    Json,
};
use futures::stream::Stream;
use lyra_common::api::{PlayRequest, PlayerSnapshot, PlaylistRequest, SeekRequest, VolumeRequest};
use std::convert::Infallible;

use crate::AppState;

/// GET /playback/state
pub async fn get_state(State(state): State<AppState>) -> Json<PlayerSnapshot> {
    Json(state.player.lock().await.snapshot())
}

/// POST /playback/play
///
/// Makes the song current and starts it when it has audio; a song
/// without audio is selected silently.
pub async fn play(
    State(state): State<AppState>,
    Json(body): Json<PlayRequest>,
) -> Json<PlayerSnapshot> {
    let mut player = state.player.lock().await;
    player.play_song(body.song);
    Json(player.snapshot())
}

/// POST /playback/toggle
pub async fn toggle(State(state): State<AppState>) -> Json<PlayerSnapshot> {
    let mut player = state.player.lock().await;
    player.toggle_play_pause();
    Json(player.snapshot())
}

/// POST /playback/next
pub async fn next(State(state): State<AppState>) -> Json<PlayerSnapshot> {
    let mut player = state.player.lock().await;
    player.play_next();
    Json(player.snapshot())
}

/// POST /playback/previous
pub async fn previous(State(state): State<AppState>) -> Json<PlayerSnapshot> {
    let mut player = state.player.lock().await;
    player.play_previous();
    Json(player.snapshot())
}

/// POST /playback/seek
pub async fn seek(
    State(state): State<AppState>,
    Json(body): Json<SeekRequest>,
) -> Json<PlayerSnapshot> {
    let mut player = state.player.lock().await;
    player.seek_to(body.position);
    Json(player.snapshot())
}

/// POST /playback/volume
pub async fn volume(
    State(state): State<AppState>,
    Json(body): Json<VolumeRequest>,
) -> Json<PlayerSnapshot> {
    let mut player = state.player.lock().await;
    player.set_volume(body.volume);
    Json(player.snapshot())
}

/// PUT /playback/playlist
pub async fn set_playlist(
    State(state): State<AppState>,
    Json(body): Json<PlaylistRequest>,
) -> Json<PlayerSnapshot> {
    let mut player = state.player.lock().await;
    player.set_playlist(body.songs);
    Json(player.snapshot())
}

/// GET /events
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    crate::sse::subscribe_stream(&state.events)
}
