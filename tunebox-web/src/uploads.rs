//! Upload directory storage
//!
//! Files are addressed by plain file name only; anything that could leave
//! the directory resolves to nothing. Uploads are staged in a hidden
//! temporary file and renamed into place once the caller is ready, so a
//! partially written upload is never served.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tunebox_common::forms::is_plain_file_name;
use tunebox_common::{Error, Result};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if it does not exist
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Path of `filename` inside the upload directory
    ///
    /// `None` for names with separators, parent references, a leading dot
    /// (which also hides in-flight temporary files) or NUL bytes.
    pub fn resolve(&self, filename: &str) -> Option<PathBuf> {
        if !is_plain_file_name(filename) {
            return None;
        }
        Some(self.dir.join(filename))
    }

    /// Write `data` to a hidden temporary file next to its final location
    ///
    /// Nothing is visible under `filename` until [`StagedUpload::persist`].
    pub async fn stage(&self, filename: &str, data: &[u8]) -> Result<StagedUpload> {
        let target = self
            .resolve(filename)
            .ok_or_else(|| Error::InvalidInput(format!("Invalid file name: {}", filename)))?;

        let temp = self
            .dir
            .join(format!(".{}.{}.part", filename, Uuid::new_v4().simple()));

        if let Err(e) = tokio::fs::write(&temp, data).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }

        debug!("Staged upload {} ({} bytes)", temp.display(), data.len());
        Ok(StagedUpload { temp, target })
    }

    /// Remove a stored file; missing files are ignored
    pub async fn remove(&self, filename: &str) {
        let Some(path) = self.resolve(filename) else {
            return;
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!("Removed upload {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove upload {}: {}", path.display(), e),
        }
    }
}

/// An upload written to a temporary file, waiting to be moved into place
#[derive(Debug)]
#[must_use = "a staged upload must be persisted or discarded"]
pub struct StagedUpload {
    temp: PathBuf,
    target: PathBuf,
}

impl StagedUpload {
    /// Atomically replace `target` with the staged file
    pub async fn persist(self) -> Result<PathBuf> {
        if let Err(e) = tokio::fs::rename(&self.temp, &self.target).await {
            warn!("Failed to move upload into place {}: {}", self.target.display(), e);
            let _ = tokio::fs::remove_file(&self.temp).await;
            return Err(e.into());
        }

        debug!("Stored upload {}", self.target.display());
        Ok(self.target)
    }

    /// Drop the staged file without touching `target`
    pub async fn discard(self) {
        if let Err(e) = tokio::fs::remove_file(&self.temp).await {
            warn!("Failed to remove staged upload {}: {}", self.temp.display(), e);
        }
    }
}
