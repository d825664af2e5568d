//! Event types for the Lyra player
//!
//! Events are broadcast by lyra-pl and serialized for SSE transmission to
//! any connected UI. All events use this central enum for exhaustive
//! matching on the consumer side.

use crate::db::models::Song;
use serde::{Deserialize, Serialize};

/// Transport mode of the player, independent of which song is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transport {
    /// No current song
    Idle,
    /// Current song set but audio not playing (no source, not yet
    /// loaded, or load failed)
    Selected,
    Playing,
    Paused,
}

impl Transport {
    pub fn is_playing(&self) -> bool {
        matches!(self, Transport::Playing)
    }
}

/// Player event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerEvent {
    /// Transport mode changed (play/pause/select/idle)
    StateChanged {
        old_state: Transport,
        new_state: Transport,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A song became the current song (with or without audio)
    TrackSelected {
        song: Song,
        /// Playlist position, -1 when the song is not in the playlist
        index: i64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Audio for the current song started producing sound
    TrackStarted {
        song_guid: uuid::Uuid,
        /// Duration reported by the decoder, when known
        duration: Option<f64>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Current song played to the end (auto-advance follows)
    TrackEnded {
        song_guid: uuid::Uuid,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Periodic position update while audio is loaded
    PlaybackProgress {
        position: f64,
        duration: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Audio load or playback failed; the player reverted to Selected
    PlaybackFailed {
        song_guid: uuid::Uuid,
        message: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Master volume changed
    VolumeChanged {
        volume: f32,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Playlist was replaced
    PlaylistReplaced {
        length: usize,
        /// Whether the current song survived into the new playlist
        current_retained: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl PlayerEvent {
    /// Event name used for the SSE `event:` field
    pub fn name(&self) -> &'static str {
        match self {
            PlayerEvent::StateChanged { .. } => "StateChanged",
            PlayerEvent::TrackSelected { .. } => "TrackSelected",
            PlayerEvent::TrackStarted { .. } => "TrackStarted",
            PlayerEvent::TrackEnded { .. } => "TrackEnded",
            PlayerEvent::PlaybackProgress { .. } => "PlaybackProgress",
            PlayerEvent::PlaybackFailed { .. } => "PlaybackFailed",
            PlayerEvent::VolumeChanged { .. } => "VolumeChanged",
            PlayerEvent::PlaylistReplaced { .. } => "PlaylistReplaced",
        }
    }
}
