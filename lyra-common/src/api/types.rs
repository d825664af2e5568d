//! Shared API request/response types
//!
//! Used by the catalog (list/search responses), the gateway (forwarded
//! verbatim), the storage service (upload results) and the player
//! (transport requests and state snapshots).

use crate::db::models::Song;
use crate::events::Transport;
use crate::pagination::Pagination;
use serde::{Deserialize, Serialize};

// ========================================
// Catalog Types
// ========================================

/// Query parameters accepted by every list endpoint
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Query parameters accepted by search endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchQuery {
    /// Case-insensitive substring to match
    pub q: String,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Pagination block echoed alongside every list response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PageInfo {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl From<Pagination> for PageInfo {
    fn from(p: Pagination) -> Self {
        Self {
            page: p.page,
            limit: p.limit,
            total: p.total,
            total_pages: p.total_pages,
            has_next: p.has_next(),
            has_prev: p.has_prev(),
        }
    }
}

/// Paginated list response envelope
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PageInfo,
}

/// Error body returned by all services
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

// ========================================
// Storage Types
// ========================================

/// Successful upload result
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    /// Public URL of the stored object
    pub url: String,
    /// Object key within the bucket
    pub key: String,
    pub original_name: String,
    pub size: u64,
    pub mime_type: String,
}

// ========================================
// Player Types
// ========================================

/// Full player state as exposed to clients
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerSnapshot {
    pub current_song: Option<Song>,
    pub transport: Transport,
    pub is_playing: bool,
    /// Position of the current song within the playlist, -1 when the
    /// current song is unset or absent from the playlist
    pub current_index: i64,
    /// Seconds into the current song
    pub position: f64,
    /// Length of the current song in seconds (0 when unknown)
    pub duration: f64,
    /// Master volume, always within [0.0, 1.0]
    pub volume: f32,
    pub playlist: Vec<Song>,
}

/// POST /playback/play body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayRequest {
    pub song: Song,
}

/// POST /playback/seek body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeekRequest {
    /// Target position in seconds
    pub position: f64,
}

/// POST /playback/volume body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VolumeRequest {
    /// Requested volume; values outside [0.0, 1.0] are clamped
    pub volume: f32,
}

/// PUT /playback/playlist body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistRequest {
    pub songs: Vec<Song>,
}
