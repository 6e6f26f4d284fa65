//! HTTP error type for tunebox-web
//!
//! Every handler returns `Result<_, ApiError>`; the variant decides the
//! status code. Internal details are logged, never sent to the client.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;
use tunebox_common::forms::FormErrors;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Submitted form failed validation
    #[error("Validation failed: {0}")]
    Validation(FormErrors),

    /// Unknown company name or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Authenticated, but the resource belongs to another company
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Name already taken
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Malformed or oversized multipart body
    #[error("Upload error: {0}")]
    Upload(#[from] MultipartError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tunebox_common::Error> for ApiError {
    fn from(err: tunebox_common::Error) -> Self {
        use tunebox_common::Error as E;
        match err {
            E::NotFound(what) => ApiError::NotFound(what),
            E::Conflict(what) => ApiError::Conflict(what),
            E::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        tunebox_common::Error::from(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(errors) => {
                return (StatusCode::BAD_REQUEST, Json(errors)).into_response();
            }
            ApiError::InvalidCredentials => {
                return (StatusCode::UNAUTHORIZED, "Invalid credentials").into_response();
            }
            ApiError::Upload(err) => return err.into_response(),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => {
                error!("Request failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
