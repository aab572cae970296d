//! Playback configuration.
//!
//! Loaded from an optional JSON file; every field has a default so a partial
//! (or missing) file is fine.

use std::path::Path;
use std::time::Duration;

use briefly_core::VoiceDescriptor;
use serde::{Deserialize, Serialize};

use crate::error::PlaybackError;

/// Default polling interval of the progress estimator.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

/// Default calibration constant `k` in `100 / (chars * k)` per tick.
pub const DEFAULT_PROGRESS_CHARS_FACTOR: f64 = 0.1;

/// Tunables for the playback controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// How often progress is re-estimated while playing.
    pub tick_interval_ms: u64,

    /// Calibration constant for the progress estimate.
    pub progress_chars_factor: f64,

    /// Pitch passed to the engine with every utterance.
    pub pitch: f32,

    /// Volume passed to the engine with every utterance (0.0–1.0).
    pub volume: f32,

    /// Rate used until the user picks one.
    pub default_rate: f32,

    /// Settings for the built-in simulated engine.
    pub simulated: SimulatedEngineConfig,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            progress_chars_factor: DEFAULT_PROGRESS_CHARS_FACTOR,
            pitch: 1.0,
            volume: 1.0,
            default_rate: 1.0,
            simulated: SimulatedEngineConfig::default(),
        }
    }
}

/// Settings for [`SimulatedEngine`](crate::engine::SimulatedEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatedEngineConfig {
    /// Characters rendered per second at rate 1.0.
    pub chars_per_second: f32,

    /// Voices the engine reports.
    pub voices: Vec<VoiceDescriptor>,
}

impl Default for SimulatedEngineConfig {
    fn default() -> Self {
        Self {
            chars_per_second: 15.0,
            voices: vec![
                VoiceDescriptor::new("sim:en-US:ava", "Ava", "en-US").as_default(),
                VoiceDescriptor::new("sim:en-GB:oliver", "Oliver", "en-GB"),
                VoiceDescriptor::new("sim:en-AU:isla", "Isla", "en-AU"),
                VoiceDescriptor::new("sim:de-DE:lena", "Lena", "de-DE"),
            ],
        }
    }
}

impl PlaybackConfig {
    /// Load config from `path`.
    ///
    /// A missing file yields the defaults; an unreadable or invalid one is an
    /// error.
    pub fn load(path: &Path) -> Result<Self, PlaybackError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No playback config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| PlaybackError::Config(format!("{}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| PlaybackError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;

        tracing::info!(path = %path.display(), "Loaded playback config");
        Ok(config)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), PlaybackError> {
        if self.tick_interval_ms == 0 {
            return Err(PlaybackError::Config(
                "tick_interval_ms must be greater than zero".into(),
            ));
        }
        if !(self.progress_chars_factor.is_finite() && self.progress_chars_factor > 0.0) {
            return Err(PlaybackError::Config(format!(
                "progress_chars_factor must be positive, got {}",
                self.progress_chars_factor
            )));
        }
        if !briefly_core::preferences::is_valid_rate(self.default_rate) {
            return Err(PlaybackError::InvalidRate(self.default_rate));
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(PlaybackError::Config(format!(
                "volume must be between 0.0 and 1.0, got {}",
                self.volume
            )));
        }
        if !(self.pitch.is_finite() && self.pitch > 0.0) {
            return Err(PlaybackError::Config(format!(
                "pitch must be positive, got {}",
                self.pitch
            )));
        }
        if !(self.simulated.chars_per_second.is_finite() && self.simulated.chars_per_second > 0.0) {
            return Err(PlaybackError::Config(format!(
                "simulated.chars_per_second must be positive, got {}",
                self.simulated.chars_per_second
            )));
        }
        Ok(())
    }

    /// Progress polling interval as a [`Duration`].
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = PlaybackConfig::default();
        config.validate().unwrap();
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
        assert!(config.simulated.voices.iter().any(|v| v.is_default));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PlaybackConfig::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, PlaybackConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"tick_interval_ms": 250, "simulated": {{"chars_per_second": 30}}}}"#)
            .unwrap();

        let config = PlaybackConfig::load(file.path()).unwrap();
        assert_eq!(config.tick_interval_ms, 250);
        assert!((config.simulated.chars_per_second - 30.0).abs() < f32::EPSILON);
        assert!(!config.simulated.voices.is_empty());
        assert!((config.default_rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn invalid_json_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = PlaybackConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, PlaybackError::Config(_)), "got {err:?}");
    }

    #[test]
    fn validate_rejects_bad_values() {
        let zero_tick = PlaybackConfig {
            tick_interval_ms: 0,
            ..PlaybackConfig::default()
        };
        assert!(zero_tick.validate().is_err());

        let loud = PlaybackConfig {
            volume: 1.5,
            ..PlaybackConfig::default()
        };
        assert!(loud.validate().is_err());

        let stopped = PlaybackConfig {
            default_rate: 0.0,
            ..PlaybackConfig::default()
        };
        assert!(matches!(stopped.validate(), Err(PlaybackError::InvalidRate(_))));
    }
}
