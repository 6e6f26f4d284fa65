//! Database models
//!
//! Plain records; persistence lives in the sibling query modules.

use serde::{Deserialize, Serialize};

/// Tenant account owning playlists
///
/// `password_hash` is an Argon2 PHC string and never leaves the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    #[serde(skip)]
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: i64,
    pub name: String,
    pub company_id: i64,
}

/// One uploaded file entry and its display position within a playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Music {
    pub id: i64,
    pub name: String,
    /// Name of the stored file inside the upload directory
    pub filename: String,
    pub playlist_id: i64,
    pub order: i64,
}

/// Fields supplied when creating a [`Music`]; `order` is assigned on insert
#[derive(Debug, Clone)]
pub struct NewMusic {
    pub name: String,
    pub filename: String,
    pub playlist_id: i64,
}

/// Server-side record binding a browser cookie to a company
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub company_id: i64,
}
