//! Port definitions for the read-aloud layer.
//!
//! Ports are the seams between the playback controller and the platform:
//! the speech engine that renders audio and the key-value store that keeps
//! user preferences. Adapters live in `briefly-tts`; nothing here knows how
//! either side is implemented.
//!
//! # Design Rules
//!
//! - No runtime policy (timers, state machines) in this module
//! - Engine callbacks are modelled as messages, never as closures
//! - All trait objects are `Send` so the controller can live on a tokio task

mod preference_store;
mod speech_engine;

pub use preference_store::{PreferenceError, PreferenceStore};
pub use speech_engine::{
    EngineError, EngineEvent, EngineEventSink, SpeechEngine, UtteranceId, UtteranceRequest,
};
