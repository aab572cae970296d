//! Preference store port.
//!
//! A small synchronous key-value store local to the running client, used to
//! remember the last chosen speech rate and voice between sessions.

use thiserror::Error;

/// Errors from writing preferences.
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// Reading or writing the backing file failed.
    #[error("Preference IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored values could not be encoded.
    #[error("Failed to encode preferences: {0}")]
    Serialize(String),

    /// The store cannot accept writes (e.g. no data directory).
    #[error("Preference store unavailable: {0}")]
    Unavailable(String),
}

/// Durable string key-value store.
///
/// Reads never fail: a missing or unreadable value is simply absent.
pub trait PreferenceStore: Send + Sync {
    /// Get the stored value for `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;
}
