//! Music upload and reordering

use axum::{
    extract::{Multipart, Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use tunebox_common::db::{musics, Music, NewMusic};
use tunebox_common::forms::MusicForm;

use super::{ensure_owner, owned_playlist, ui};
use crate::session::CurrentCompany;
use crate::uploads::StagedUpload;
use crate::{ApiError, AppState};

/// GET /add_music/:playlist_id
pub async fn add_music_page(
    State(state): State<AppState>,
    CurrentCompany(current): CurrentCompany,
    Path(playlist_id): Path<i64>,
) -> Result<Html<&'static str>, ApiError> {
    owned_playlist(&state, &current, playlist_id).await?;
    Ok(Html(ui::ADD_MUSIC_HTML))
}

/// POST /add_music/:playlist_id
///
/// Multipart field `music`. The file is staged before any database work;
/// the record is then appended inside a transaction that commits only once
/// the file is in place, so a failed write leaves no dangling record and a
/// rejected duplicate name never touches the stored file.
pub async fn add_music(
    State(state): State<AppState>,
    CurrentCompany(current): CurrentCompany,
    Path(playlist_id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let playlist = owned_playlist(&state, &current, playlist_id).await?;

    let mut form = MusicForm::default();
    let mut data = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(MusicForm::FIELD) {
            continue;
        }
        form.filename = field.file_name().map(str::to_string);
        data = field.bytes().await?.to_vec();
    }

    let filename = form.validate().map_err(ApiError::Validation)?;
    let new_music = NewMusic {
        name: filename.clone(),
        filename: filename.clone(),
        playlist_id: playlist.id,
    };

    let staged = state.uploads.stage(&filename, &data).await?;
    let music = store_music(&state, &new_music, staged).await?;

    info!(
        "Added music {} ({}, {} bytes) to playlist {} at position {}",
        music.id,
        music.filename,
        data.len(),
        playlist.id,
        music.order
    );

    Ok(Redirect::to(&format!("/playlist/{}", playlist.id)).into_response())
}

/// Append the record and move the staged file into place
///
/// The transaction's first statement is the insert, so it holds the write
/// lock only for the insert, the rename and the commit.
async fn store_music(
    state: &AppState,
    new_music: &NewMusic,
    staged: StagedUpload,
) -> Result<Music, ApiError> {
    let mut tx = match state.db.begin().await {
        Ok(tx) => tx,
        Err(e) => {
            staged.discard().await;
            return Err(e.into());
        }
    };

    let music = match musics::append(&mut *tx, new_music).await {
        Ok(music) => music,
        Err(e) => {
            staged.discard().await;
            return Err(e.into());
        }
    };

    staged.persist().await?;

    if let Err(e) = tx.commit().await {
        warn!("Rolled back upload of {}: {}", new_music.filename, e);
        state.uploads.remove(&new_music.filename).await;
        return Err(e.into());
    }

    Ok(music)
}

/// A music identifier as sent by drag-and-drop clients: a JSON number or a
/// numeric string taken from a DOM data attribute.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MusicId {
    Number(i64),
    Text(String),
}

impl MusicId {
    fn parse(&self) -> Result<i64, ApiError> {
        match self {
            MusicId::Number(id) => Ok(*id),
            MusicId::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| ApiError::BadRequest(format!("Invalid music id: {:?}", text))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    #[serde(default)]
    pub order: Vec<MusicId>,
}

#[derive(Debug, Serialize)]
pub struct ReorderResponse {
    pub status: &'static str,
}

/// POST /reorder
///
/// Sets each listed music's position to its index. Unknown ids are
/// skipped; if any listed music belongs to another company nothing changes.
pub async fn reorder(
    State(state): State<AppState>,
    CurrentCompany(current): CurrentCompany,
    Json(request): Json<ReorderRequest>,
) -> Result<Json<ReorderResponse>, ApiError> {
    let ids = request
        .order
        .iter()
        .map(MusicId::parse)
        .collect::<Result<Vec<i64>, _>>()?;

    for id in &ids {
        if let Some(owner) = musics::owning_company(&state.db, *id).await? {
            ensure_owner(&current, owner, &format!("Music {}", id))?;
        }
    }

    let updated = musics::reorder(&state.db, &ids).await?;
    debug!("Reorder by company {} updated {} musics", current.id, updated);

    Ok(Json(ReorderResponse { status: "success" }))
}
