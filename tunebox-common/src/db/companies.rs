//! Company queries

use super::models::Company;
use crate::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

fn company_from_row(row: &SqliteRow) -> Company {
    Company {
        id: row.get("id"),
        name: row.get("name"),
        password_hash: row.get("password_hash"),
    }
}

/// Insert a new company
///
/// Returns [`Error::Conflict`] when the name is already registered.
pub async fn insert(
    db: &SqlitePool,
    name: &str,
    password_hash: &str,
) -> Result<Company> {
    let result = sqlx::query(
        "INSERT INTO companies (name, password_hash) VALUES (?, ?)",
    )
    .bind(name)
    .bind(password_hash)
    .execute(db)
    .await
    .map_err(|e| Error::from_insert(e, "Company name"))?;

    Ok(Company {
        id: result.last_insert_rowid(),
        name: name.to_string(),
        password_hash: password_hash.to_string(),
    })
}

pub async fn find_by_id(db: &SqlitePool, id: i64) -> Result<Option<Company>> {
    let row = sqlx::query(
        "SELECT id, name, password_hash FROM companies WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;

    Ok(row.as_ref().map(company_from_row))
}

pub async fn find_by_name(db: &SqlitePool, name: &str) -> Result<Option<Company>> {
    let row = sqlx::query(
        "SELECT id, name, password_hash FROM companies WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(db)
    .await?;

    Ok(row.as_ref().map(company_from_row))
}
