//! Speech engine port: the platform service that renders text as audio.
//!
//! The engine exposes no playback position and no live rate control. It
//! accepts one utterance at a time, can pause/resume/cancel it, and reports
//! lifecycle events back through an [`EngineEventSink`] that the controller
//! hands over at construction time.

use std::fmt;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::VoiceDescriptor;

/// Identity of one submitted utterance.
///
/// Every engine event carries the id of the utterance it belongs to, so the
/// consumer can discard late events from an utterance it already replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtteranceId(u64);

impl UtteranceId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The id following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "utt-{}", self.0)
    }
}

/// Text plus rendering parameters submitted to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct UtteranceRequest {
    pub id: UtteranceId,
    pub text: String,

    /// Speed multiplier, 1.0 = normal.
    pub rate: f32,

    pub pitch: f32,

    /// 0.0 = muted, 1.0 = full.
    pub volume: f32,

    /// `None` lets the engine use its own default voice.
    pub voice: Option<VoiceDescriptor>,
}

/// Lifecycle events reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Audio output for the utterance began.
    Started(UtteranceId),

    /// The utterance was rendered to completion.
    Ended(UtteranceId),

    /// Rendering failed; the utterance is dead.
    Error {
        utterance: UtteranceId,
        message: String,
    },

    /// The voice list changed (platforms often enumerate voices lazily).
    VoicesChanged,
}

impl EngineEvent {
    /// The utterance this event belongs to, if any.
    pub const fn utterance(&self) -> Option<UtteranceId> {
        match self {
            Self::Started(id) | Self::Ended(id) | Self::Error { utterance: id, .. } => Some(*id),
            Self::VoicesChanged => None,
        }
    }
}

/// Sending half of the controller's engine-event queue.
///
/// Engines clone this into whatever task or callback reports progress.
/// Delivery is best-effort: once the controller is gone, events are dropped.
#[derive(Debug, Clone)]
pub struct EngineEventSink {
    tx: mpsc::UnboundedSender<EngineEvent>,
}

impl EngineEventSink {
    /// Create a sink and the receiver the controller drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<EngineEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Report an event. Returns `false` if nobody is listening any more.
    pub fn emit(&self, event: EngineEvent) -> bool {
        if self.tx.send(event).is_err() {
            tracing::debug!("Engine event receiver dropped");
            return false;
        }
        true
    }
}

/// Errors reported synchronously by the engine on submission.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// The engine refused the utterance (empty text, unsupported voice, ...).
    #[error("Utterance rejected: {0}")]
    Rejected(String),

    /// The engine is not available on this platform or not initialised.
    #[error("Speech engine unavailable: {0}")]
    Unavailable(String),

    /// Rendering failed.
    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),
}

/// Backend-agnostic speech engine.
///
/// Implementations must be `Send` so the controller that owns them can run
/// on a tokio task. Commands take effect immediately; `cancel` in particular
/// must stop further event delivery for the cancelled utterance.
pub trait SpeechEngine: Send {
    /// Receive the sink that lifecycle events must be reported through.
    ///
    /// Called once by the controller before any other method.
    fn attach(&mut self, events: EngineEventSink);

    /// Currently known voices. May be empty until the platform enumerates them.
    fn voices(&self) -> Vec<VoiceDescriptor>;

    /// Submit an utterance for rendering.
    ///
    /// `Ok` means the engine accepted it; `Started`/`Ended`/`Error` follow
    /// asynchronously through the sink.
    fn speak(&mut self, request: UtteranceRequest) -> Result<(), EngineError>;

    /// Pause the active utterance.
    fn pause(&mut self);

    /// Resume a paused utterance.
    fn resume(&mut self);

    /// Drop the active utterance without reporting `Ended` or `Error` for it.
    fn cancel(&mut self);

    /// Whether an utterance is currently being rendered (paused counts).
    fn is_speaking(&self) -> bool;

    /// Whether the active utterance is paused.
    fn is_paused(&self) -> bool;
}
