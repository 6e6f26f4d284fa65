//! Database models and queries

pub mod companies;
pub mod init;
pub mod models;
pub mod musics;
pub mod playlists;
pub mod sessions;

pub use init::*;
pub use models::*;
