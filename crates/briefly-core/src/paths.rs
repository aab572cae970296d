//! Data directory resolution for Briefly client state.
//!
//! Resolution order for the data root:
//! 1. `BRIEFLY_DATA_DIR` environment variable (highest priority)
//! 2. System data directory (e.g., `~/.local/share/briefly`)

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable that overrides the data root.
pub const DATA_DIR_ENV: &str = "BRIEFLY_DATA_DIR";

const APP_DIR_NAME: &str = "briefly";
const PREFERENCES_FILE: &str = "preferences.json";
const CONFIG_FILE: &str = "config.json";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// Could not determine the user's home directory.
    #[error("Cannot determine home directory")]
    NoHomeDir,

    /// Could not determine the system data directory.
    #[error("Cannot determine system data directory")]
    NoDataDir,

    /// Failed to create a directory.
    #[error("Failed to create directory {path}: {reason}")]
    CreateFailed { path: PathBuf, reason: String },

    /// An empty path was provided.
    #[error("Path cannot be empty")]
    EmptyPath,
}

/// Get the root directory for client data (preferences, config), creating it
/// if needed.
pub fn data_root() -> Result<PathBuf, PathError> {
    let override_dir = env::var(DATA_DIR_ENV).ok();
    let root = resolve_data_root(override_dir.as_deref())?;
    ensure_dir(&root)?;
    Ok(root)
}

/// Path of the preferences file under `root`.
pub fn preferences_path(root: &Path) -> PathBuf {
    root.join(PREFERENCES_FILE)
}

/// Path of the optional playback config file under `root`.
pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Pure resolution step of [`data_root`], without touching the filesystem.
pub fn resolve_data_root(override_dir: Option<&str>) -> Result<PathBuf, PathError> {
    if let Some(raw) = override_dir.filter(|s| !s.trim().is_empty()) {
        return normalize_user_path(raw);
    }

    let data_dir = dirs::data_local_dir().ok_or(PathError::NoDataDir)?;
    Ok(data_dir.join(APP_DIR_NAME))
}

/// Normalize a user-provided path, expanding a leading `~`.
pub fn normalize_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathError::EmptyPath);
    }

    if trimmed == "~" {
        return dirs::home_dir().ok_or(PathError::NoHomeDir);
    }
    if let Some(rest) = trimmed.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
        return Ok(home.join(rest));
    }

    Ok(PathBuf::from(trimmed))
}

fn ensure_dir(path: &Path) -> Result<(), PathError> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| PathError::CreateFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    }
    Ok(())
}
