//! Login, registration and logout

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use tracing::{info, warn};
use tunebox_common::db::{companies, sessions};
use tunebox_common::forms::CompanyForm;
use tunebox_common::password::{hash_password, verify_password};

use super::ui;
use crate::session::{expired_session_cookie, session_cookie, session_token, MaybeCompany, LOGIN_PATH};
use crate::{ApiError, AppState};

/// GET /login
pub async fn login_page(MaybeCompany(current): MaybeCompany) -> Response {
    if current.is_some() {
        return Redirect::to("/").into_response();
    }
    Html(ui::LOGIN_HTML).into_response()
}

/// POST /login
///
/// Unknown names and wrong passwords get the same 401 so the response does
/// not reveal which companies exist.
pub async fn login(
    State(state): State<AppState>,
    MaybeCompany(current): MaybeCompany,
    Form(form): Form<CompanyForm>,
) -> Result<Response, ApiError> {
    if current.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let form = form.validate().map_err(ApiError::Validation)?;

    let company = companies::find_by_name(&state.db, &form.name).await?;
    let verified = match &company {
        Some(c) => check_password(form.password.clone(), c.password_hash.clone()).await?,
        None => false,
    };
    let company = match company {
        Some(c) if verified => c,
        _ => {
            warn!("Failed login for company name {:?}", form.name);
            return Err(ApiError::InvalidCredentials);
        }
    };

    let session = sessions::create(&state.db, company.id).await?;
    info!("Company {} ({}) logged in", company.id, company.name);

    Ok((
        [(header::SET_COOKIE, session_cookie(&session.token))],
        Redirect::to("/"),
    )
        .into_response())
}

/// Argon2 verification on the blocking pool
async fn check_password(password: String, password_hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
        .await
        .map_err(|e| ApiError::Internal(format!("Password check task failed: {}", e)))
}

/// GET /register
pub async fn register_page(MaybeCompany(current): MaybeCompany) -> Response {
    if current.is_some() {
        return Redirect::to("/").into_response();
    }
    Html(ui::REGISTER_HTML).into_response()
}

/// POST /register
///
/// A taken name yields 409 and leaves the existing company untouched.
pub async fn register(
    State(state): State<AppState>,
    MaybeCompany(current): MaybeCompany,
    Form(form): Form<CompanyForm>,
) -> Result<Response, ApiError> {
    if current.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let form = form.validate().map_err(ApiError::Validation)?;
    let password = form.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(format!("Password hashing task failed: {}", e)))??;

    let company = companies::insert(&state.db, &form.name, &password_hash).await?;
    info!("Registered company {} ({})", company.id, company.name);

    Ok(Redirect::to(LOGIN_PATH).into_response())
}

/// GET /logout
///
/// Always succeeds, with or without a session.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if let Some(token) = session_token(&headers) {
        sessions::delete(&state.db, &token).await?;
    }

    Ok((
        [(header::SET_COOKIE, expired_session_cookie())],
        Redirect::to(LOGIN_PATH),
    )
        .into_response())
}
