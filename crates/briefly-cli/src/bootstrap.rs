//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where the playback stack is wired together
//! for the CLI:
//! - Data directory and playback config
//! - File-backed preference store
//! - Speech engine (simulated) and controller

use std::path::PathBuf;
use std::sync::Arc;

use briefly_core::paths::{config_path, data_root, normalize_user_path, preferences_path};
use briefly_tts::{
    JsonFilePreferenceStore, PlaybackConfig, PlaybackController, PlaybackEvent, SimulatedEngine,
};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::error::CliError;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Directory holding preferences and the default config file.
    pub data_dir: PathBuf,
    /// Playback config file; may not exist.
    pub config_path: PathBuf,
}

impl CliConfig {
    /// Create config, honouring `--data-dir` and `--config` when given.
    pub fn with_overrides(data_dir: Option<&str>, config: Option<&str>) -> Result<Self, CliError> {
        let data_dir = match data_dir {
            Some(raw) => {
                let dir = normalize_user_path(raw)?;
                std::fs::create_dir_all(&dir).map_err(|e| {
                    CliError::Io(format!(
                        "Failed to create data directory {}: {e}",
                        dir.display()
                    ))
                })?;
                dir
            }
            None => data_root()?,
        };

        let config_path = match config {
            Some(raw) => normalize_user_path(raw)?,
            None => config_path(&data_dir),
        };

        Ok(Self {
            data_dir,
            config_path,
        })
    }
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    /// Loaded playback configuration.
    pub playback: PlaybackConfig,
    /// Persistent preference store.
    pub store: Arc<JsonFilePreferenceStore>,
}

impl CliContext {
    /// Build a controller around a fresh simulated engine.
    pub fn controller(&self) -> (PlaybackController, UnboundedReceiver<PlaybackEvent>) {
        let engine = SimulatedEngine::new(&self.playback.simulated);
        PlaybackController::new(
            Box::new(engine),
            self.store.clone(),
            self.playback.clone(),
        )
    }
}

/// Wire the CLI context from `config`.
pub fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    let playback = PlaybackConfig::load(&config.config_path)?;
    let store = Arc::new(JsonFilePreferenceStore::open(preferences_path(
        &config.data_dir,
    )));

    tracing::debug!(data_dir = %config.data_dir.display(), "CLI bootstrapped");
    Ok(CliContext {
        playback,
        store,
    })
}
