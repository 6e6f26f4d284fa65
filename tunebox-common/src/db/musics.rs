//! Music queries
//!
//! Display position is the `sort_order` column. Identifiers are never
//! rewritten; reordering only touches positions.

use super::models::{Music, NewMusic};
use crate::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteExecutor, SqlitePool};
use tracing::debug;

fn music_from_row(row: &SqliteRow) -> Music {
    Music {
        id: row.get("id"),
        name: row.get("name"),
        filename: row.get("filename"),
        playlist_id: row.get("playlist_id"),
        order: row.get("sort_order"),
    }
}

/// Number of musics currently in a playlist
pub async fn count_in_playlist<'e, E>(executor: E, playlist_id: i64) -> Result<i64>
where
    E: SqliteExecutor<'e>,
{
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM musics WHERE playlist_id = ?")
        .bind(playlist_id)
        .fetch_one(executor)
        .await?;

    Ok(count)
}

/// Insert a music at the given position
///
/// Prefer [`append`] for new uploads. Returns [`Error::Conflict`] when the
/// name is taken.
pub async fn insert<'e, E>(executor: E, music: &NewMusic, order: i64) -> Result<Music>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        "INSERT INTO musics (name, filename, playlist_id, sort_order) VALUES (?, ?, ?, ?)",
    )
    .bind(&music.name)
    .bind(&music.filename)
    .bind(music.playlist_id)
    .bind(order)
    .execute(executor)
    .await
    .map_err(|e| Error::from_insert(e, "Music"))?;

    Ok(Music {
        id: result.last_insert_rowid(),
        name: music.name.clone(),
        filename: music.filename.clone(),
        playlist_id: music.playlist_id,
        order,
    })
}

/// Append a music at the end of its playlist
///
/// The position is computed and the row inserted by one statement, so the
/// write lock is taken before the count is read and concurrent appends get
/// distinct positions. Returns [`Error::Conflict`] when the name is taken.
pub async fn append<'e, E>(executor: E, music: &NewMusic) -> Result<Music>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query(
        r#"
        INSERT INTO musics (name, filename, playlist_id, sort_order)
        SELECT ?, ?, ?, COUNT(*) FROM musics WHERE playlist_id = ?
        RETURNING id, sort_order
        "#,
    )
    .bind(&music.name)
    .bind(&music.filename)
    .bind(music.playlist_id)
    .bind(music.playlist_id)
    .fetch_one(executor)
    .await
    .map_err(|e| Error::from_insert(e, "Music"))?;

    Ok(Music {
        id: row.get("id"),
        name: music.name.clone(),
        filename: music.filename.clone(),
        playlist_id: music.playlist_id,
        order: row.get("sort_order"),
    })
}

pub async fn find_by_id(db: &SqlitePool, id: i64) -> Result<Option<Music>> {
    let row = sqlx::query(
        "SELECT id, name, filename, playlist_id, sort_order FROM musics WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;

    Ok(row.as_ref().map(music_from_row))
}

/// Musics of a playlist in display order
///
/// Ties on position fall back to creation order.
pub async fn list_for_playlist(db: &SqlitePool, playlist_id: i64) -> Result<Vec<Music>> {
    let rows = sqlx::query(
        r#"
        SELECT id, name, filename, playlist_id, sort_order
        FROM musics
        WHERE playlist_id = ?
        ORDER BY sort_order ASC, id ASC
        "#,
    )
    .bind(playlist_id)
    .fetch_all(db)
    .await?;

    Ok(rows.iter().map(music_from_row).collect())
}

/// Company owning the playlist a music belongs to
pub async fn owning_company(db: &SqlitePool, music_id: i64) -> Result<Option<i64>> {
    let company_id: Option<i64> = sqlx::query_scalar(
        r#"
        SELECT p.company_id
        FROM musics m
        JOIN playlists p ON m.playlist_id = p.id
        WHERE m.id = ?
        "#,
    )
    .bind(music_id)
    .fetch_optional(db)
    .await?;

    Ok(company_id)
}

/// Set each referenced music's position to its index in `ids`
///
/// Unknown identifiers are skipped. Runs as a single transaction and
/// returns the number of rows updated.
pub async fn reorder(db: &SqlitePool, ids: &[i64]) -> Result<u64> {
    let mut tx = db.begin().await?;
    let mut updated = 0;

    for (index, id) in ids.iter().enumerate() {
        let result = sqlx::query("UPDATE musics SET sort_order = ? WHERE id = ?")
            .bind(index as i64)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            debug!("Reorder skipped unknown music id {}", id);
        }
        updated += result.rows_affected();
    }

    tx.commit().await?;
    Ok(updated)
}
