//! Artist database operations

use super::{like_pattern, parse_guid};
use lyra_common::db::models::Artist;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

fn artist_from_row(row: &SqliteRow) -> sqlx::Result<Artist> {
    Ok(Artist {
        guid: parse_guid(row, "guid")?,
        name: row.try_get("name")?,
        image_url: row.try_get("image_url")?,
    })
}

/// Partial update; absent fields keep their stored values
#[derive(Debug, Default, Clone)]
pub struct ArtistUpdate {
    pub name: Option<String>,
    pub image_url: Option<String>,
}

pub async fn count(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM artists")
        .fetch_one(pool)
        .await
}

pub async fn list(pool: &SqlitePool, limit: i64, offset: i64) -> sqlx::Result<Vec<Artist>> {
    let rows = sqlx::query(
        "SELECT guid, name, image_url FROM artists ORDER BY name ASC LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    rows.iter().map(artist_from_row).collect()
}

pub async fn count_search(pool: &SqlitePool, q: &str) -> sqlx::Result<i64> {
    sqlx::query_scalar(r"SELECT COUNT(*) FROM artists WHERE name LIKE ? ESCAPE '\'")
        .bind(like_pattern(q))
        .fetch_one(pool)
        .await
}

pub async fn search(
    pool: &SqlitePool,
    q: &str,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<Artist>> {
    let rows = sqlx::query(
        r"SELECT guid, name, image_url FROM artists
          WHERE name LIKE ? ESCAPE '\'
          ORDER BY name ASC LIMIT ? OFFSET ?",
    )
    .bind(like_pattern(q))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    rows.iter().map(artist_from_row).collect()
}

pub async fn get(pool: &SqlitePool, guid: Uuid) -> sqlx::Result<Option<Artist>> {
    let row = sqlx::query("SELECT guid, name, image_url FROM artists WHERE guid = ?")
        .bind(guid.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(artist_from_row).transpose()
}

pub async fn insert(pool: &SqlitePool, artist: &Artist) -> sqlx::Result<()> {
    sqlx::query("INSERT INTO artists (guid, name, image_url) VALUES (?, ?, ?)")
        .bind(artist.guid.to_string())
        .bind(&artist.name)
        .bind(&artist.image_url)
        .execute(pool)
        .await?;

    Ok(())
}

/// Apply a partial update. Returns false when the guid does not exist.
pub async fn update(pool: &SqlitePool, guid: Uuid, changes: &ArtistUpdate) -> sqlx::Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE artists SET
            name = COALESCE(?, name),
            image_url = COALESCE(?, image_url),
            updated_at = CURRENT_TIMESTAMP
        WHERE guid = ?
        "#,
    )
    .bind(&changes.name)
    .bind(&changes.image_url)
    .bind(guid.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Returns false when the guid does not exist. Fails with a foreign key
/// violation while albums or songs still reference the artist.
pub async fn delete(pool: &SqlitePool, guid: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM artists WHERE guid = ?")
        .bind(guid.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyra_common::db::init::init_memory_database;

    #[tokio::test]
    async fn test_insert_list_ordered_by_name() {
        let pool = init_memory_database().await.expect("db");

        for name in ["Queen", "The Beatles", "Led Zeppelin"] {
            insert(
                &pool,
                &Artist {
                    guid: Uuid::new_v4(),
                    name: name.to_string(),
                    image_url: None,
                },
            )
            .await
            .expect("insert");
        }

        let all = list(&pool, 20, 0).await.expect("list");
        let names: Vec<&str> = all.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Led Zeppelin", "Queen", "The Beatles"]);
        assert_eq!(count(&pool).await.expect("count"), 3);
    }

    #[tokio::test]
    async fn test_update_preserves_unset_fields() {
        let pool = init_memory_database().await.expect("db");
        let artist = Artist {
            guid: Uuid::new_v4(),
            name: "Queen".to_string(),
            image_url: Some("https://images.example.com/queen.jpg".to_string()),
        };
        insert(&pool, &artist).await.expect("insert");

        update(
            &pool,
            artist.guid,
            &ArtistUpdate {
                name: Some("Queen (UK)".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("update");

        let loaded = get(&pool, artist.guid).await.expect("get").expect("row");
        assert_eq!(loaded.name, "Queen (UK)");
        assert_eq!(
            loaded.image_url.as_deref(),
            Some("https://images.example.com/queen.jpg")
        );
    }
}
