//! Playlist queries

use super::models::Playlist;
use crate::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

fn playlist_from_row(row: &SqliteRow) -> Playlist {
    Playlist {
        id: row.get("id"),
        name: row.get("name"),
        company_id: row.get("company_id"),
    }
}

/// Insert a playlist owned by `company_id`
///
/// Returns [`Error::Conflict`] when the name is taken.
pub async fn insert(db: &SqlitePool, company_id: i64, name: &str) -> Result<Playlist> {
    let result = sqlx::query("INSERT INTO playlists (name, company_id) VALUES (?, ?)")
        .bind(name)
        .bind(company_id)
        .execute(db)
        .await
        .map_err(|e| Error::from_insert(e, "Playlist name"))?;

    Ok(Playlist {
        id: result.last_insert_rowid(),
        name: name.to_string(),
        company_id,
    })
}

pub async fn find_by_id(db: &SqlitePool, id: i64) -> Result<Option<Playlist>> {
    let row = sqlx::query("SELECT id, name, company_id FROM playlists WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await?;

    Ok(row.as_ref().map(playlist_from_row))
}

pub async fn list_for_company(db: &SqlitePool, company_id: i64) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        "SELECT id, name, company_id FROM playlists WHERE company_id = ? ORDER BY id",
    )
    .bind(company_id)
    .fetch_all(db)
    .await?;

    Ok(rows.iter().map(playlist_from_row).collect())
}
