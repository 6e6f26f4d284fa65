//! # Tunebox Common Library
//!
//! Shared code for the Tunebox web service:
//! - Record types and repository queries (companies, playlists, musics, sessions)
//! - Database initialization
//! - Configuration loading and root folder resolution
//! - Password hashing
//! - Form validation

pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod password;

pub use error::{Error, Result};
