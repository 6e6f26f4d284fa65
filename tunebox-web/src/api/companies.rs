//! Home and company views

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tunebox_common::db::{companies, playlists, Company, Playlist};

use super::ensure_owner;
use crate::session::CurrentCompany;
use crate::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub struct CompanyView {
    pub company: Company,
    pub playlists: Vec<Playlist>,
}

/// GET /
///
/// Playlists of the session company.
pub async fn home(
    State(state): State<AppState>,
    CurrentCompany(company): CurrentCompany,
) -> Result<Json<CompanyView>, ApiError> {
    let playlists = playlists::list_for_company(&state.db, company.id).await?;
    Ok(Json(CompanyView { company, playlists }))
}

/// GET /company/:company_id
///
/// Owner-only: another company's id is refused with 403.
pub async fn company(
    State(state): State<AppState>,
    CurrentCompany(current): CurrentCompany,
    Path(company_id): Path<i64>,
) -> Result<Json<CompanyView>, ApiError> {
    let company = companies::find_by_id(&state.db, company_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Company {}", company_id)))?;

    ensure_owner(&current, company.id, &format!("Company {}", company_id))?;

    let playlists = playlists::list_for_company(&state.db, company.id).await?;
    Ok(Json(CompanyView { company, playlists }))
}
