//! Session queries
//!
//! Sessions have no expiry; they live until logout.

use super::models::{Company, Session};
use crate::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Create a session for a company with a fresh random token
pub async fn create(db: &SqlitePool, company_id: i64) -> Result<Session> {
    let token = Uuid::new_v4().simple().to_string();

    sqlx::query("INSERT INTO sessions (token, company_id) VALUES (?, ?)")
        .bind(&token)
        .bind(company_id)
        .execute(db)
        .await?;

    Ok(Session { token, company_id })
}

/// Resolve a session token to its company
pub async fn find_company(db: &SqlitePool, token: &str) -> Result<Option<Company>> {
    let row = sqlx::query(
        r#"
        SELECT c.id, c.name, c.password_hash
        FROM sessions s
        JOIN companies c ON s.company_id = c.id
        WHERE s.token = ?
        "#,
    )
    .bind(token)
    .fetch_optional(db)
    .await?;

    Ok(row.map(|row| Company {
        id: row.get("id"),
        name: row.get("name"),
        password_hash: row.get("password_hash"),
    }))
}

/// Delete a session; deleting an unknown token is not an error
pub async fn delete(db: &SqlitePool, token: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(db)
        .await?;

    Ok(())
}
