//! tunebox-web library - HTTP surface of Tunebox
//!
//! Companies register, log in, create playlists and upload music files
//! into ordered playlists. Data views respond with JSON; form pages are
//! static HTML embedded in the binary.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod session;
pub mod uploads;

pub use error::ApiError;
pub use uploads::{StagedUpload, UploadStore};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Upload directory access
    pub uploads: Arc<UploadStore>,
    /// Request body limit for music uploads
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(db: SqlitePool, uploads: UploadStore, max_upload_bytes: usize) -> Self {
        Self {
            db,
            uploads: Arc::new(uploads),
            max_upload_bytes,
        }
    }
}

/// Build application router
///
/// Session-required routes check the session through the
/// [`session::CurrentCompany`] extractor and redirect to `/login` without one.
/// `/uploads/*`, `/login`, `/register`, `/logout` and `/health` are public.
pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/", get(api::home))
        .route("/login", get(api::login_page).post(api::login))
        .route("/register", get(api::register_page).post(api::register))
        .route("/logout", get(api::logout))
        .route("/company/:company_id", get(api::company))
        .route(
            "/create_playlist/:company_id",
            get(api::create_playlist_page).post(api::create_playlist),
        )
        .route(
            "/add_music/:playlist_id",
            get(api::add_music_page)
                .post(api::add_music)
                .layer(upload_limit),
        )
        .route("/playlist/:playlist_id", get(api::playlist))
        .route("/uploads/:filename", get(api::serve_upload))
        .route("/reorder", post(api::reorder))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
