//! Common error types for Tunebox

use thiserror::Error;

/// Common result type for Tunebox operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Tunebox crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique constraint violated (name already taken)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map a unique-constraint violation to [`Error::Conflict`], passing
    /// every other database error through unchanged.
    pub fn from_insert(err: sqlx::Error, what: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Error::Conflict(format!("{} already exists", what))
            }
            _ => Error::Database(err),
        }
    }
}
