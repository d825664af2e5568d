//! Demo catalog seeding
//!
//! Populates an empty catalog with a small set of well-known records so
//! the suite is browsable immediately after first start. Skipped when the
//! songs table already has rows.

use lyra_common::db::models::{Album, Artist, SongRow};
use lyra_common::Result;
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::info;

use crate::db::{albums, artists, songs};

struct SeedSong {
    title: &'static str,
    artist: &'static str,
    album: &'static str,
    year: i64,
    duration: f64,
    image_url: &'static str,
}

const SEED_SONGS: &[SeedSong] = &[
    SeedSong {
        title: "Bohemian Rhapsody",
        artist: "Queen",
        album: "A Night at the Opera",
        year: 1975,
        duration: 355.0,
        image_url: "https://images.unsplash.com/photo-1571019613454-1cb2f99b2d8b?w=400&h=400&fit=crop",
    },
    SeedSong {
        title: "Love of My Life",
        artist: "Queen",
        album: "A Night at the Opera",
        year: 1975,
        duration: 218.0,
        image_url: "https://images.unsplash.com/photo-1571019613454-1cb2f99b2d8b?w=400&h=400&fit=crop",
    },
    SeedSong {
        title: "Stairway to Heaven",
        artist: "Led Zeppelin",
        album: "Led Zeppelin IV",
        year: 1971,
        duration: 482.0,
        image_url: "https://images.unsplash.com/photo-1511735111819-9a3f7709049c?w=400&h=400&fit=crop",
    },
    SeedSong {
        title: "Black Dog",
        artist: "Led Zeppelin",
        album: "Led Zeppelin IV",
        year: 1971,
        duration: 296.0,
        image_url: "https://images.unsplash.com/photo-1511735111819-9a3f7709049c?w=400&h=400&fit=crop",
    },
    SeedSong {
        title: "Money",
        artist: "Pink Floyd",
        album: "The Dark Side of the Moon",
        year: 1973,
        duration: 382.0,
        image_url: "https://images.unsplash.com/photo-1598300042247-d088f8ab3a91?w=400&h=400&fit=crop",
    },
    SeedSong {
        title: "Time",
        artist: "Pink Floyd",
        album: "The Dark Side of the Moon",
        year: 1973,
        duration: 413.0,
        image_url: "https://images.unsplash.com/photo-1598300042247-d088f8ab3a91?w=400&h=400&fit=crop",
    },
    SeedSong {
        title: "Come Together",
        artist: "The Beatles",
        album: "Abbey Road",
        year: 1969,
        duration: 259.0,
        image_url: "https://images.unsplash.com/photo-1493225457124-a3eb161ffa5f?w=400&h=400&fit=crop",
    },
    SeedSong {
        title: "Something",
        artist: "The Beatles",
        album: "Abbey Road",
        year: 1969,
        duration: 182.0,
        image_url: "https://images.unsplash.com/photo-1493225457124-a3eb161ffa5f?w=400&h=400&fit=crop",
    },
];

/// Insert the demo catalog when the songs table is empty.
/// Returns the number of songs inserted.
pub async fn seed_if_empty(pool: &SqlitePool) -> Result<usize> {
    if songs::count(pool).await? > 0 {
        info!("Catalog already populated, skipping seed");
        return Ok(0);
    }

    let mut artist_guids = HashMap::new();
    let mut album_guids = HashMap::new();

    for seed in SEED_SONGS {
        let artist_guid = match artist_guids.get(seed.artist) {
            Some(guid) => *guid,
            None => {
                let artist = Artist {
                    guid: uuid::Uuid::new_v4(),
                    name: seed.artist.to_string(),
                    image_url: Some(seed.image_url.to_string()),
                };
                artists::insert(pool, &artist).await?;
                artist_guids.insert(seed.artist, artist.guid);
                artist.guid
            }
        };

        let album_guid = match album_guids.get(seed.album) {
            Some(guid) => *guid,
            None => {
                let album = Album {
                    guid: uuid::Uuid::new_v4(),
                    name: seed.album.to_string(),
                    year: Some(seed.year),
                    artist_guid,
                    image_url: Some(seed.image_url.to_string()),
                };
                albums::insert(pool, &album).await?;
                album_guids.insert(seed.album, album.guid);
                album.guid
            }
        };

        // Seeded songs have no audio until something is uploaded for
        // them; the player treats them as selectable but unplayable.
        songs::insert(
            pool,
            &SongRow {
                guid: uuid::Uuid::new_v4(),
                title: seed.title.to_string(),
                duration: Some(seed.duration),
                artist_guid,
                album_guid,
                image_url: Some(seed.image_url.to_string()),
                audio_url: None,
            },
        )
        .await?;
    }

    info!(
        "Seeded demo catalog: {} artists, {} albums, {} songs",
        artist_guids.len(),
        album_guids.len(),
        SEED_SONGS.len()
    );
    Ok(SEED_SONGS.len())
}
