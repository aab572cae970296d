//! Core domain types and port definitions for Briefly read-aloud.
//!
//! This crate holds the data the playback layer works with (articles,
//! voice descriptors, preferences) and the ports it talks through
//! (speech engine, preference store). It carries no runtime policy.

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod paths;
pub mod ports;
pub mod preferences;

// Re-export commonly used types for convenience
pub use domain::{Article, ArticleSummary, VoiceCatalog, VoiceDescriptor};
pub use paths::{PathError, config_path, data_root, preferences_path};
pub use ports::{
    EngineError, EngineEvent, EngineEventSink, PreferenceError, PreferenceStore, SpeechEngine,
    UtteranceId, UtteranceRequest,
};
pub use preferences::{Preferences, RATE_KEY, RATE_PRESETS, VOICE_KEY};
