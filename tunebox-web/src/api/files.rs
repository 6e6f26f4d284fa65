//! Uploaded file serving
//!
//! Public route. Only plain file names directly under the upload directory
//! are served; everything else is 404.

use axum::{
    extract::{Path, Request, State},
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::debug;

use crate::{ApiError, AppState};

/// GET /uploads/:filename
pub async fn serve_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    request: Request,
) -> Result<Response, ApiError> {
    let Some(path) = state.uploads.resolve(&filename) else {
        debug!("Refused upload path {:?}", filename);
        return Err(ApiError::NotFound(format!("File {}", filename)));
    };

    // ServeFile answers 404 itself when the file is missing
    let response = match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    Ok(response.into_response())
}
