//! Application configuration.
//!
//! Settings live in a JSON file under the platform config directory
//! (overridable for tests). Missing files yield defaults; unknown or
//! partial files fill in defaults per section.
//!
//! The embedding API key is not part of the settings file. It comes from
//! the `VOYAGE_API_KEY` environment variable only.

mod settings;

pub use settings::{ChunkingSettings, EmbeddingSettings, Settings, StorageSettings};

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;

/// Environment variable holding the Voyage API key.
pub const API_KEY_ENV: &str = "VOYAGE_API_KEY";

const SETTINGS_FILE: &str = "settings.json";

/// Errors that can occur loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("could not determine a config directory for this platform")]
    NoConfigDir,

    #[error("{API_KEY_ENV} is not set")]
    MissingApiKey,
}

/// Returns the default settings file path under the platform config
/// directory.
pub fn default_settings_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("", "", "mnemo").ok_or(ConfigError::NoConfigDir)?;
    Ok(dirs.config_dir().join(SETTINGS_FILE))
}

/// Returns the default database file path under the platform data
/// directory.
pub fn default_db_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("", "", "mnemo").ok_or(ConfigError::NoConfigDir)?;
    Ok(dirs.data_dir().join("chunks.db"))
}

/// Loads settings from a file, falling back to defaults if it does not
/// exist.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(serde_json::from_str(&contents)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Settings::default()),
        Err(err) => Err(err.into()),
    }
}

/// Saves settings as pretty-printed JSON, creating parent directories as
/// needed.
pub fn save_settings(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Reads the embedding API key from the environment.
pub fn api_key_from_env() -> Result<String, ConfigError> {
    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(ConfigError::MissingApiKey),
    }
}
