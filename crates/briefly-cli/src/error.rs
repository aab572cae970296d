//! CLI-specific error types and exit codes.

use briefly_core::PathError;
use briefly_tts::PlaybackError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument or input file content is unusable.
    #[error("Invalid input: {0}")]
    Input(String),

    /// A file or directory could not be read or created.
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Playback failed.
    #[error("Playback error: {0}")]
    Playback(String),
}

impl CliError {
    /// Map error to appropriate exit code (see sysexits.h).
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Input(_) => 65,    // EX_DATAERR
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
            Self::Playback(_) => 1,
        }
    }
}

impl From<PlaybackError> for CliError {
    fn from(err: PlaybackError) -> Self {
        match err {
            PlaybackError::Config(msg) => Self::Config(msg),
            PlaybackError::InvalidRate(_) | PlaybackError::UnknownVoice(_) => {
                Self::Input(err.to_string())
            }
            other => Self::Playback(other.to_string()),
        }
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        Self::Config(err.to_string())
    }
}
