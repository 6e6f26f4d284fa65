//! tunebox-web - Main entry point
//!
//! Resolves the root folder, loads `tunebox.toml`, opens (or creates) the
//! database and upload directory, then serves the HTTP API until Ctrl+C or
//! SIGTERM.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tunebox_common::config::{resolve_root_folder, AppConfig};
use tunebox_common::db::init_database;
use tunebox_web::{build_router, AppState, UploadStore};

/// Command-line arguments for tunebox-web
#[derive(Parser, Debug)]
#[command(name = "tunebox-web")]
#[command(about = "Multi-tenant playlist and music upload service")]
#[command(version)]
struct Args {
    /// Root folder holding tunebox.toml, the database and uploads
    /// (falls back to TUNEBOX_ROOT_FOLDER, the user config file, then the OS default)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Address to bind (overrides tunebox.toml)
    #[arg(long, env = "TUNEBOX_HOST")]
    host: Option<String>,

    /// Port to listen on (overrides tunebox.toml)
    #[arg(short, long, env = "TUNEBOX_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tunebox_web=info,tunebox_common=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting tunebox-web v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let root_folder = resolve_root_folder(args.root_folder.as_deref());
    std::fs::create_dir_all(&root_folder)
        .with_context(|| format!("Failed to create root folder {}", root_folder.display()))?;
    info!("Root folder: {}", root_folder.display());

    let mut config = AppConfig::load(&root_folder).context("Failed to load settings")?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let db_path = config.database_path(&root_folder);
    let pool = init_database(&db_path)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    let uploads = UploadStore::new(config.upload_dir(&root_folder));
    uploads
        .ensure_dir()
        .await
        .context("Failed to create upload directory")?;
    info!("Upload directory: {}", uploads.dir().display());

    let state = AppState::new(pool, uploads, config.max_upload_bytes());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind to {}:{}", config.host, config.port))?;
    let addr: SocketAddr = listener.local_addr()?;
    info!("tunebox-web listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
