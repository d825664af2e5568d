//! Catalog entity models
//!
//! Rows as stored plus the joined views the list endpoints return. Entity
//! references are by guid; the joined views carry the referenced names so
//! clients render lists without extra round trips.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub guid: Uuid,
    pub name: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub guid: Uuid,
    pub name: String,
    pub year: Option<i64>,
    pub artist_guid: Uuid,
    pub image_url: Option<String>,
}

/// Album joined with its artist's name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumDetail {
    pub guid: Uuid,
    pub name: String,
    pub year: Option<i64>,
    pub artist_guid: Uuid,
    pub artist_name: String,
    pub image_url: Option<String>,
}

/// Song row as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongRow {
    pub guid: Uuid,
    pub title: String,
    /// Length in seconds; unknown for uploads without probed metadata
    pub duration: Option<f64>,
    pub artist_guid: Uuid,
    pub album_guid: Uuid,
    pub image_url: Option<String>,
    /// Streamable audio location; a song without one is browsable but
    /// not playable
    pub audio_url: Option<String>,
}

/// Song joined with artist and album names: the shape list endpoints
/// return and the player consumes as playlist entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Song {
    pub guid: Uuid,
    pub title: String,
    pub duration: Option<f64>,
    pub artist_guid: Uuid,
    pub artist_name: String,
    pub album_guid: Uuid,
    pub album_name: String,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
}

impl Song {
    /// True when the song carries a usable audio location
    pub fn has_audio(&self) -> bool {
        self.audio_url
            .as_deref()
            .map(|u| !u.trim().is_empty())
            .unwrap_or(false)
    }
}
