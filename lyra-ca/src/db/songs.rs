//! Song database operations

use super::{like_pattern, parse_guid};
use lyra_common::db::models::{Song, SongRow};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Columns of the joined song view, shared by every SELECT here
const SONG_SELECT: &str = r#"
    SELECT s.guid, s.title, s.duration,
           s.artist_guid, ar.name AS artist_name,
           s.album_guid, al.name AS album_name,
           s.image_url, s.audio_url
    FROM songs s
    JOIN artists ar ON s.artist_guid = ar.guid
    JOIN albums al ON s.album_guid = al.guid
"#;

/// Partial update; absent fields keep their stored values
#[derive(Debug, Default, Clone)]
pub struct SongUpdate {
    pub title: Option<String>,
    pub duration: Option<f64>,
    pub artist_guid: Option<Uuid>,
    pub album_guid: Option<Uuid>,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
}

fn song_from_row(row: &SqliteRow) -> sqlx::Result<Song> {
    Ok(Song {
        guid: parse_guid(row, "guid")?,
        title: row.try_get("title")?,
        duration: row.try_get("duration")?,
        artist_guid: parse_guid(row, "artist_guid")?,
        artist_name: row.try_get("artist_name")?,
        album_guid: parse_guid(row, "album_guid")?,
        album_name: row.try_get("album_name")?,
        image_url: row.try_get("image_url")?,
        audio_url: row.try_get("audio_url")?,
    })
}

pub async fn count(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM songs")
        .fetch_one(pool)
        .await
}

pub async fn list(pool: &SqlitePool, limit: i64, offset: i64) -> sqlx::Result<Vec<Song>> {
    let rows = sqlx::query(&format!(
        "{SONG_SELECT} ORDER BY s.title ASC LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    rows.iter().map(song_from_row).collect()
}

pub async fn count_search(pool: &SqlitePool, q: &str) -> sqlx::Result<i64> {
    let pattern = like_pattern(q);
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM songs s
        JOIN artists ar ON s.artist_guid = ar.guid
        JOIN albums al ON s.album_guid = al.guid
        WHERE s.title LIKE ? ESCAPE '\'
           OR ar.name LIKE ? ESCAPE '\'
           OR al.name LIKE ? ESCAPE '\'
        "#,
    )
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .fetch_one(pool)
    .await
}

/// Case-insensitive substring search over song title, artist name and
/// album name
pub async fn search(
    pool: &SqlitePool,
    q: &str,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<Song>> {
    let pattern = like_pattern(q);
    let rows = sqlx::query(&format!(
        r#"{SONG_SELECT}
        WHERE s.title LIKE ? ESCAPE '\'
           OR ar.name LIKE ? ESCAPE '\'
           OR al.name LIKE ? ESCAPE '\'
        ORDER BY s.title ASC LIMIT ? OFFSET ?"#
    ))
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    rows.iter().map(song_from_row).collect()
}

pub async fn get(pool: &SqlitePool, guid: Uuid) -> sqlx::Result<Option<Song>> {
    let row = sqlx::query(&format!("{SONG_SELECT} WHERE s.guid = ?"))
        .bind(guid.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(song_from_row).transpose()
}

pub async fn insert(pool: &SqlitePool, song: &SongRow) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO songs (guid, title, duration, artist_guid, album_guid, image_url, audio_url)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(song.guid.to_string())
    .bind(&song.title)
    .bind(song.duration)
    .bind(song.artist_guid.to_string())
    .bind(song.album_guid.to_string())
    .bind(&song.image_url)
    .bind(&song.audio_url)
    .execute(pool)
    .await?;

    Ok(())
}

/// Apply a partial update. Returns false when the guid does not exist.
pub async fn update(pool: &SqlitePool, guid: Uuid, changes: &SongUpdate) -> sqlx::Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE songs SET
            title = COALESCE(?, title),
            duration = COALESCE(?, duration),
            artist_guid = COALESCE(?, artist_guid),
            album_guid = COALESCE(?, album_guid),
            image_url = COALESCE(?, image_url),
            audio_url = COALESCE(?, audio_url),
            updated_at = CURRENT_TIMESTAMP
        WHERE guid = ?
        "#,
    )
    .bind(&changes.title)
    .bind(changes.duration)
    .bind(changes.artist_guid.map(|g| g.to_string()))
    .bind(changes.album_guid.map(|g| g.to_string()))
    .bind(&changes.image_url)
    .bind(&changes.audio_url)
    .bind(guid.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Returns false when the guid does not exist
pub async fn delete(pool: &SqlitePool, guid: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM songs WHERE guid = ?")
        .bind(guid.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
