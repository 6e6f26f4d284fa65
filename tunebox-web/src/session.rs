//! Request-scoped session context
//!
//! The browser carries a random token in the `tunebox_session` cookie; the
//! token resolves to a company through the `sessions` table. Handlers take
//! [`CurrentCompany`] when a session is required and [`MaybeCompany`] when
//! it is optional.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};
use tunebox_common::db::{sessions, Company};

use crate::{ApiError, AppState};

pub const SESSION_COOKIE: &str = "tunebox_session";

/// Where unauthenticated requests to protected routes are sent
pub const LOGIN_PATH: &str = "/login";

/// Extract the session token from the `Cookie` header(s)
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// `Set-Cookie` value establishing a session
pub fn session_cookie(token: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, token)
}

/// `Set-Cookie` value removing the session cookie
pub fn expired_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

/// Authenticated company, if any
pub struct MaybeCompany(pub Option<Company>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeCompany {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers) else {
            return Ok(MaybeCompany(None));
        };

        let company = sessions::find_company(&state.db, &token).await?;
        Ok(MaybeCompany(company))
    }
}

/// Authenticated company; rejects with a redirect to `/login`
pub struct CurrentCompany(pub Company);

#[async_trait]
impl FromRequestParts<AppState> for CurrentCompany {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match MaybeCompany::from_request_parts(parts, state).await {
            Ok(MaybeCompany(Some(company))) => Ok(CurrentCompany(company)),
            Ok(MaybeCompany(None)) => Err(Redirect::to(LOGIN_PATH).into_response()),
            Err(e) => Err(e.into_response()),
        }
    }
}
