//! HTTP handlers for tunebox-web

pub mod auth;
pub mod companies;
pub mod files;
pub mod health;
pub mod musics;
pub mod playlists;
pub mod ui;

pub use auth::{login, login_page, logout, register, register_page};
pub use companies::{company, home};
pub use files::serve_upload;
pub use health::health_routes;
pub use musics::{add_music, add_music_page, reorder};
pub use playlists::{create_playlist, create_playlist_page, playlist};

use tracing::warn;
use tunebox_common::db::{playlists as playlist_db, Company, Playlist};

use crate::{ApiError, AppState};

/// Refuse access to another company's data
fn ensure_owner(company: &Company, owner_id: i64, resource: &str) -> Result<(), ApiError> {
    if company.id != owner_id {
        warn!(
            "Company {} denied access to {} owned by company {}",
            company.id, resource, owner_id
        );
        return Err(ApiError::Forbidden(format!("{} belongs to another company", resource)));
    }
    Ok(())
}

/// Load a playlist the session company owns: 404 if unknown, 403 if foreign
async fn owned_playlist(
    state: &AppState,
    company: &Company,
    playlist_id: i64,
) -> Result<Playlist, ApiError> {
    let playlist = playlist_db::find_by_id(&state.db, playlist_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Playlist {}", playlist_id)))?;

    ensure_owner(company, playlist.company_id, &format!("Playlist {}", playlist_id))?;
    Ok(playlist)
}
