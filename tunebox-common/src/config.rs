//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "TUNEBOX_ROOT_FOLDER";

/// Name of the per-instance settings file inside the root folder
pub const SETTINGS_FILE_NAME: &str = "tunebox.toml";

/// Root folder resolution, highest priority first:
/// 1. Command-line argument
/// 2. Environment variable (`TUNEBOX_ROOT_FOLDER`)
/// 3. `root_folder` key in the user/system TOML config file
/// 4. OS-dependent compiled default
pub fn resolve_root_folder(cli_arg: Option<&Path>) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Ok(config_path) = load_config_file() {
        match root_folder_from_config(&config_path) {
            Ok(Some(root_folder)) => return root_folder,
            Ok(None) => {}
            Err(e) => warn!("Ignoring config file {}: {}", config_path.display(), e),
        }
    }

    get_default_root_folder()
}

fn root_folder_from_config(config_path: &Path) -> Result<Option<PathBuf>> {
    let toml_content = std::fs::read_to_string(config_path)?;
    let config = toml::from_str::<toml::Value>(&toml_content)
        .map_err(|e| Error::Config(e.to_string()))?;

    Ok(config
        .get("root_folder")
        .and_then(|v| v.as_str())
        .map(PathBuf::from))
}

/// Locate the user (or, on Linux, system-wide) config file
fn load_config_file() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("tunebox").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/tunebox/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// Get OS-dependent default root folder path
fn get_default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/tunebox (or /var/lib/tunebox for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("tunebox"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/tunebox"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("tunebox"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/tunebox"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("tunebox"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\tunebox"))
    } else {
        PathBuf::from("./tunebox_data")
    }
}

/// Per-instance settings read from `<root>/tunebox.toml`
///
/// Every field is optional in the file. Relative paths are resolved against
/// the root folder.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: PathBuf,
    pub upload_folder: PathBuf,
    pub max_upload_mb: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            database: PathBuf::from("tunebox.db"),
            upload_folder: PathBuf::from("uploads"),
            max_upload_mb: 64,
        }
    }
}

impl AppConfig {
    /// Load settings from the root folder.
    ///
    /// A missing settings file is not an error: defaults are used.
    /// A file that exists but does not parse is.
    pub fn load(root_folder: &Path) -> Result<Self> {
        let path = root_folder.join(SETTINGS_FILE_NAME);
        if !path.exists() {
            info!("No {} in {}, using defaults", SETTINGS_FILE_NAME, root_folder.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        if config.max_upload_mb == 0 {
            return Err(Error::Config("max_upload_mb must be greater than 0".to_string()));
        }
        Ok(config)
    }

    pub fn database_path(&self, root_folder: &Path) -> PathBuf {
        root_folder.join(&self.database)
    }

    pub fn upload_dir(&self, root_folder: &Path) -> PathBuf {
        root_folder.join(&self.upload_folder)
    }

    pub fn max_upload_bytes(&self) -> usize {
        (self.max_upload_mb as usize).saturating_mul(1024 * 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_file_empty() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = AppConfig::from_toml_str("port = 8080\nupload_folder = \"media\"").unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.upload_folder, PathBuf::from("media"));
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn test_zero_upload_limit_rejected() {
        assert!(matches!(
            AppConfig::from_toml_str("max_upload_mb = 0"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_relative_paths_resolve_against_root() {
        let config = AppConfig::default();
        let root = Path::new("/srv/tunebox");
        assert_eq!(config.database_path(root), PathBuf::from("/srv/tunebox/tunebox.db"));
        assert_eq!(config.upload_dir(root), PathBuf::from("/srv/tunebox/uploads"));
    }

    #[test]
    fn test_absolute_upload_folder_wins() {
        let config = AppConfig::from_toml_str("upload_folder = \"/data/uploads\"").unwrap();
        assert_eq!(
            config.upload_dir(Path::new("/srv/tunebox")),
            PathBuf::from("/data/uploads")
        );
    }
}
