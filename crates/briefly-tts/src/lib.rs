//! Read-aloud playback for Briefly.
//!
//! A [`PlaybackController`] drives one speech engine through a single active
//! reading at a time: start, pause, resume, stop, and restart when the rate
//! or voice changes. Engines report lifecycle events through an inbound queue;
//! progress is estimated from a periodic tick because engines expose no
//! playback position.
//!
//! [`PlaybackService`] runs a controller on its own task behind a cloneable
//! [`PlaybackHandle`].

#![deny(unused_crate_dependencies)]

// Used only by the integration tests under tests/.
#[cfg(test)]
use mockall as _;

pub mod catalog;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod progress;
pub mod service;
pub mod store;

// Re-export key types for convenience
pub use catalog::{VoiceSelection, VoiceSource};
pub use config::{PlaybackConfig, SimulatedEngineConfig};
pub use controller::{
    Inbound, PlaybackController, PlaybackEvent, PlaybackSnapshot, PlaybackStatus,
};
pub use engine::{SimulatedEngine, SimulatedVoices};
pub use error::PlaybackError;
pub use progress::{ProgressTicker, Tick};
pub use service::{PlaybackHandle, PlaybackService};
pub use store::{JsonFilePreferenceStore, MemoryPreferenceStore};
