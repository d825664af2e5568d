//! Database access layer for lyra-ca
//!
//! Per-entity query modules. Guids are stored as hyphenated TEXT; writes
//! bind string form, reads decode through sqlx's text support.

pub mod albums;
pub mod artists;
pub mod songs;

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

/// Decode a guid stored as hyphenated TEXT
pub(crate) fn parse_guid(row: &SqliteRow, column: &str) -> sqlx::Result<Uuid> {
    let text: String = row.try_get(column)?;
    Uuid::parse_str(&text).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// Build a LIKE pattern matching `q` as a literal substring,
/// case-insensitively. LIKE wildcards in the query are escaped so user
/// input never becomes a pattern.
pub fn like_pattern(q: &str) -> String {
    let escaped = q
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
