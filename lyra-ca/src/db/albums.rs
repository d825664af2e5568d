//! Album database operations

use super::{like_pattern, parse_guid};
use lyra_common::db::models::{Album, AlbumDetail};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

fn album_from_row(row: &SqliteRow) -> sqlx::Result<AlbumDetail> {
    Ok(AlbumDetail {
        guid: parse_guid(row, "guid")?,
        name: row.try_get("name")?,
        year: row.try_get("year")?,
        artist_guid: parse_guid(row, "artist_guid")?,
        artist_name: row.try_get("artist_name")?,
        image_url: row.try_get("image_url")?,
    })
}

const ALBUM_SELECT: &str = r#"
    SELECT al.guid, al.name, al.year, al.artist_guid, ar.name AS artist_name, al.image_url
    FROM albums al
    JOIN artists ar ON al.artist_guid = ar.guid
"#;

/// Partial update; absent fields keep their stored values
#[derive(Debug, Default, Clone)]
pub struct AlbumUpdate {
    pub name: Option<String>,
    pub year: Option<i64>,
    pub artist_guid: Option<Uuid>,
    pub image_url: Option<String>,
}

pub async fn count(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM albums")
        .fetch_one(pool)
        .await
}

pub async fn list(pool: &SqlitePool, limit: i64, offset: i64) -> sqlx::Result<Vec<AlbumDetail>> {
    let rows = sqlx::query(&format!(
        "{ALBUM_SELECT} ORDER BY al.name ASC LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    rows.iter().map(album_from_row).collect()
}

pub async fn count_search(pool: &SqlitePool, q: &str) -> sqlx::Result<i64> {
    sqlx::query_scalar(r"SELECT COUNT(*) FROM albums WHERE name LIKE ? ESCAPE '\'")
        .bind(like_pattern(q))
        .fetch_one(pool)
        .await
}

pub async fn search(
    pool: &SqlitePool,
    q: &str,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<AlbumDetail>> {
    let rows = sqlx::query(&format!(
        r"{ALBUM_SELECT} WHERE al.name LIKE ? ESCAPE '\' ORDER BY al.name ASC LIMIT ? OFFSET ?"
    ))
    .bind(like_pattern(q))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    rows.iter().map(album_from_row).collect()
}

pub async fn get(pool: &SqlitePool, guid: Uuid) -> sqlx::Result<Option<AlbumDetail>> {
    let row = sqlx::query(&format!("{ALBUM_SELECT} WHERE al.guid = ?"))
        .bind(guid.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(album_from_row).transpose()
}

pub async fn insert(pool: &SqlitePool, album: &Album) -> sqlx::Result<()> {
    sqlx::query("INSERT INTO albums (guid, name, year, artist_guid, image_url) VALUES (?, ?, ?, ?, ?)")
        .bind(album.guid.to_string())
        .bind(&album.name)
        .bind(album.year)
        .bind(album.artist_guid.to_string())
        .bind(&album.image_url)
        .execute(pool)
        .await?;

    Ok(())
}

/// Apply a partial update. Returns false when the guid does not exist.
pub async fn update(pool: &SqlitePool, guid: Uuid, changes: &AlbumUpdate) -> sqlx::Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE albums SET
            name = COALESCE(?, name),
            year = COALESCE(?, year),
            artist_guid = COALESCE(?, artist_guid),
            image_url = COALESCE(?, image_url),
            updated_at = CURRENT_TIMESTAMP
        WHERE guid = ?
        "#,
    )
    .bind(&changes.name)
    .bind(changes.year)
    .bind(changes.artist_guid.map(|g| g.to_string()))
    .bind(&changes.image_url)
    .bind(guid.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Returns false when the guid does not exist. Fails with a foreign key
/// violation while songs still reference the album.
pub async fn delete(pool: &SqlitePool, guid: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM albums WHERE guid = ?")
        .bind(guid.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
