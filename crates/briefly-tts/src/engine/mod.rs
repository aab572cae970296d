//! Speech engine adapters.
//!
//! The [`PlaybackController`](crate::controller::PlaybackController) operates
//! on a `Box<dyn SpeechEngine>` so platform engines can be swapped without
//! touching the playback logic.
//!
//! | Module        | Engine                                             |
//! |---------------|----------------------------------------------------|
//! | [`simulated`] | Timing-only engine: no audio, realistic lifecycle. |

pub mod simulated;

pub use simulated::{SimulatedEngine, SimulatedVoices};
