//! Playlist creation and playlist view

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Serialize;
use tracing::info;
use tunebox_common::db::{companies, musics, playlists, Company, Music, Playlist};
use tunebox_common::forms::PlaylistForm;

use super::{ensure_owner, owned_playlist, ui};
use crate::session::CurrentCompany;
use crate::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub struct PlaylistView {
    pub playlist: Playlist,
    /// In display order
    pub musics: Vec<Music>,
}

/// The target company must exist (404) and be the session company (403)
async fn check_target_company(
    state: &AppState,
    current: &Company,
    company_id: i64,
) -> Result<(), ApiError> {
    if companies::find_by_id(&state.db, company_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("Company {}", company_id)));
    }
    ensure_owner(current, company_id, &format!("Company {}", company_id))
}

/// GET /create_playlist/:company_id
pub async fn create_playlist_page(
    State(state): State<AppState>,
    CurrentCompany(current): CurrentCompany,
    Path(company_id): Path<i64>,
) -> Result<Html<&'static str>, ApiError> {
    check_target_company(&state, &current, company_id).await?;
    Ok(Html(ui::CREATE_PLAYLIST_HTML))
}

/// POST /create_playlist/:company_id
pub async fn create_playlist(
    State(state): State<AppState>,
    CurrentCompany(current): CurrentCompany,
    Path(company_id): Path<i64>,
    Form(form): Form<PlaylistForm>,
) -> Result<Response, ApiError> {
    check_target_company(&state, &current, company_id).await?;

    let form = form.validate().map_err(ApiError::Validation)?;
    let playlist = playlists::insert(&state.db, company_id, &form.name).await?;
    info!(
        "Company {} created playlist {} ({})",
        company_id, playlist.id, playlist.name
    );

    Ok(Redirect::to("/").into_response())
}

/// GET /playlist/:playlist_id
///
/// Musics are listed by position, not by identifier.
pub async fn playlist(
    State(state): State<AppState>,
    CurrentCompany(current): CurrentCompany,
    Path(playlist_id): Path<i64>,
) -> Result<Json<PlaylistView>, ApiError> {
    let playlist = owned_playlist(&state, &current, playlist_id).await?;
    let musics = musics::list_for_playlist(&state.db, playlist.id).await?;
    Ok(Json(PlaylistView { playlist, musics }))
}
