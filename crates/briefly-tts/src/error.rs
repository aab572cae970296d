//! Playback error types.

use briefly_core::{EngineError, PreferenceError};

/// Errors surfaced by playback commands.
///
/// Empty article text is deliberately not an error: `start` simply reports
/// that nothing was started.
#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    /// Rate must be a finite number above zero.
    #[error("Invalid speech rate {0}: must be a finite number above zero")]
    InvalidRate(f32),

    /// The requested voice is not in the current catalog.
    #[error("Unknown voice '{0}'")]
    UnknownVoice(String),

    /// The speech engine refused or failed the utterance.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Reading or writing preferences failed.
    #[error(transparent)]
    Preference(#[from] PreferenceError),

    /// The playback service task is no longer running.
    #[error("Playback service has stopped")]
    ServiceStopped,

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}
