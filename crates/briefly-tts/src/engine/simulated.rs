//! Simulated speech engine.
//!
//! Produces no audio. An utterance "plays" for
//! `chars / (chars_per_second * rate)` seconds on a tokio timer, reporting
//! `Started` on submission and `Ended` when the timer fires. Pausing keeps the
//! remaining time; cancelling drops the timer without reporting anything.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use briefly_core::{
    EngineError, EngineEvent, EngineEventSink, SpeechEngine, UtteranceId, UtteranceRequest,
    VoiceDescriptor,
};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::config::SimulatedEngineConfig;

/// State shared between the engine and its [`SimulatedVoices`] handles.
#[derive(Debug, Default)]
struct Shared {
    voices: Vec<VoiceDescriptor>,
    sink: Option<EngineEventSink>,
}

/// The utterance currently being "rendered".
#[derive(Debug)]
struct Active {
    id: UtteranceId,
    remaining: Duration,
    resumed_at: Instant,
    paused: bool,
    timer: Option<JoinHandle<()>>,
}

impl Active {
    fn abort_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

/// Timing-only [`SpeechEngine`].
#[derive(Debug)]
pub struct SimulatedEngine {
    chars_per_second: f32,
    shared: Arc<Mutex<Shared>>,
    active: Option<Active>,
}

/// Cloneable handle for changing the simulated voice list after the engine
/// has been handed to a controller.
#[derive(Debug, Clone)]
pub struct SimulatedVoices {
    shared: Arc<Mutex<Shared>>,
}

impl SimulatedVoices {
    /// Replace the voice list and report `VoicesChanged`, the way platforms
    /// that enumerate voices lazily do.
    pub fn publish(&self, voices: Vec<VoiceDescriptor>) {
        let sink = match self.shared.lock() {
            Ok(mut shared) => {
                shared.voices = voices;
                shared.sink.clone()
            }
            Err(_) => {
                tracing::warn!("Simulated voice list poisoned");
                return;
            }
        };

        if let Some(sink) = sink {
            sink.emit(EngineEvent::VoicesChanged);
        }
    }
}

impl SimulatedEngine {
    pub fn new(config: &SimulatedEngineConfig) -> Self {
        Self {
            chars_per_second: config.chars_per_second,
            shared: Arc::new(Mutex::new(Shared {
                voices: config.voices.clone(),
                sink: None,
            })),
            active: None,
        }
    }

    /// Handle for publishing voice list updates.
    pub fn voices_handle(&self) -> SimulatedVoices {
        SimulatedVoices {
            shared: Arc::clone(&self.shared),
        }
    }

    /// How long `text` takes at `rate`.
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_for(&self, text: &str, rate: f32) -> Duration {
        let chars = text.chars().count() as f64;
        let per_second = f64::from(self.chars_per_second) * f64::from(rate);
        Duration::from_secs_f64(chars / per_second)
    }

    fn sink(&self) -> Option<EngineEventSink> {
        self.shared.lock().ok()?.sink.clone()
    }

    fn arm(&self, id: UtteranceId, after: Duration) -> Option<JoinHandle<()>> {
        let sink = self.sink()?;
        Some(tokio::spawn(async move {
            tokio::time::sleep(after).await;
            sink.emit(EngineEvent::Ended(id));
        }))
    }
}

impl SpeechEngine for SimulatedEngine {
    fn attach(&mut self, events: EngineEventSink) {
        if let Ok(mut shared) = self.shared.lock() {
            shared.sink = Some(events);
        }
    }

    fn voices(&self) -> Vec<VoiceDescriptor> {
        self.shared
            .lock()
            .map(|shared| shared.voices.clone())
            .unwrap_or_default()
    }

    fn speak(&mut self, request: UtteranceRequest) -> Result<(), EngineError> {
        if request.text.trim().is_empty() {
            return Err(EngineError::Rejected("empty text".into()));
        }
        if !(request.rate.is_finite() && request.rate > 0.0) {
            return Err(EngineError::Rejected(format!("rate {}", request.rate)));
        }
        let sink = self
            .sink()
            .ok_or_else(|| EngineError::Unavailable("engine not attached".into()))?;

        self.cancel();

        let duration = self.duration_for(&request.text, request.rate);
        tracing::debug!(
            utterance = %request.id,
            voice = request.voice.as_ref().map_or("default", |v| v.id.as_str()),
            duration_ms = duration.as_millis(),
            "Simulated speech started"
        );

        sink.emit(EngineEvent::Started(request.id));
        self.active = Some(Active {
            id: request.id,
            remaining: duration,
            resumed_at: Instant::now(),
            paused: false,
            timer: self.arm(request.id, duration),
        });
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(active) = self.active.as_mut().filter(|a| !a.paused) {
            active.abort_timer();
            active.remaining = active.remaining.saturating_sub(active.resumed_at.elapsed());
            active.paused = true;
        }
    }

    fn resume(&mut self) {
        let Some((id, remaining)) = self
            .active
            .as_ref()
            .filter(|a| a.paused)
            .map(|a| (a.id, a.remaining))
        else {
            return;
        };

        let timer = self.arm(id, remaining);
        if let Some(active) = self.active.as_mut() {
            active.timer = timer;
            active.resumed_at = Instant::now();
            active.paused = false;
        }
    }

    fn cancel(&mut self) {
        if let Some(mut active) = self.active.take() {
            active.abort_timer();
        }
    }

    fn is_speaking(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| a.paused || a.timer.as_ref().is_some_and(|t| !t.is_finished()))
    }

    fn is_paused(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.paused)
    }
}

impl Drop for SimulatedEngine {
    fn drop(&mut self) {
        self.cancel();
    }
}
