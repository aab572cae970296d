//! Read-aloud playback controller: one active session, driven by engine
//! callbacks and a progress ticker.
//!
//! ```text
//!   Idle ──start──▶ Playing ◀──resume── Paused
//!                     │  └────pause─────▶ │
//!                     ├──engine Ended──▶ Ended ──▶ Idle
//!                     └──engine Error──▶ Failed ─▶ Idle
//!   (stop from any state ▶ Idle)
//! ```
//!
//! The controller owns the speech engine and reacts to two inbound queues:
//! engine lifecycle events and progress ticks. Both are tagged with the
//! utterance they belong to; anything tagged with a superseded utterance is
//! dropped. Drain the queues with [`PlaybackController::process_pending`] or
//! [`PlaybackController::pump`], or hand the controller to
//! [`PlaybackService`](crate::service::PlaybackService).

use std::fmt;
use std::sync::Arc;

use briefly_core::preferences::is_valid_rate;
use briefly_core::{
    Article, EngineEvent, EngineEventSink, PreferenceStore, Preferences, RATE_KEY, SpeechEngine,
    UtteranceId, UtteranceRequest, VOICE_KEY, VoiceCatalog, VoiceDescriptor,
};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::catalog::{self, Resolution, VoiceSelection, VoiceSource};
use crate::config::PlaybackConfig;
use crate::error::PlaybackError;
use crate::progress::{self, PROGRESS_MAX, ProgressTicker, Tick};

// ── Playback state machine ─────────────────────────────────────────

/// Current state of read-aloud playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    /// Nothing is being read.
    #[default]
    Idle,

    /// An utterance has been accepted by the engine and is being read.
    Playing,

    /// Reading is suspended; progress is frozen.
    Paused,

    /// The utterance completed. Transient: normalises to `Idle`.
    Ended,

    /// The engine reported an error. Transient: normalises to `Idle`.
    Failed,
}

impl PlaybackStatus {
    /// `Playing` or `Paused`.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Playing | Self::Paused)
    }
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Ended => "ended",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Read-only view of the controller for presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    pub status: PlaybackStatus,
    pub article: Option<Article>,
    pub rate: f32,
    pub voice: Option<VoiceDescriptor>,
    pub available_voices: Vec<VoiceDescriptor>,
    pub progress_percent: f64,
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self {
            status: PlaybackStatus::Idle,
            article: None,
            rate: 1.0,
            voice: None,
            available_voices: Vec::new(),
            progress_percent: 0.0,
        }
    }
}

// ── Events emitted by the controller ───────────────────────────────

/// Events emitted by the controller to observers.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// Status changed.
    StateChanged(PlaybackStatus),

    /// Estimated progress changed (0–100).
    Progress(f64),

    /// A new utterance was accepted for this article.
    SessionStarted { article_id: String, title: String },

    /// The engine reported that audio output began.
    SpeechStarted,

    /// The article was read to completion.
    Finished { article_id: String },

    /// The engine failed while reading the article.
    Failed { article_id: String, message: String },

    /// The voice catalog was refreshed; carries the voice count.
    VoicesUpdated(usize),

    /// The speech rate changed.
    RateChanged(f32),

    /// The selected voice changed; carries the voice id.
    VoiceChanged(Option<String>),
}

/// A message from one of the controller's inbound queues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Engine(EngineEvent),
    Tick(Tick),
}

// ── Controller ─────────────────────────────────────────────────────

/// The one active reading.
#[derive(Debug)]
struct Session {
    utterance: UtteranceId,
    article: Article,
    text: String,
    text_chars: usize,
}

/// Single-session read-aloud controller.
pub struct PlaybackController {
    engine: Box<dyn SpeechEngine>,
    store: Arc<dyn PreferenceStore>,
    config: PlaybackConfig,

    status: PlaybackStatus,
    session: Option<Session>,
    progress: f64,
    rate: f32,
    rate_chosen: bool,
    selection: VoiceSelection,
    catalog: VoiceCatalog,
    preferences: Option<Preferences>,
    next_utterance: UtteranceId,
    ticker: Option<ProgressTicker>,

    engine_rx: mpsc::UnboundedReceiver<EngineEvent>,
    tick_tx: mpsc::UnboundedSender<Tick>,
    tick_rx: mpsc::UnboundedReceiver<Tick>,
    event_tx: mpsc::UnboundedSender<PlaybackEvent>,
}

impl PlaybackController {
    /// Create a controller around `engine`.
    ///
    /// Returns `(controller, event_receiver)`. The engine is attached to the
    /// controller's event queue immediately; call [`initialize`](Self::initialize)
    /// before the first `start` to load preferences and resolve a voice.
    pub fn new(
        mut engine: Box<dyn SpeechEngine>,
        store: Arc<dyn PreferenceStore>,
        config: PlaybackConfig,
    ) -> (Self, mpsc::UnboundedReceiver<PlaybackEvent>) {
        let (sink, engine_rx) = EngineEventSink::channel();
        engine.attach(sink);

        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let controller = Self {
            engine,
            store,
            rate: config.default_rate,
            config,
            status: PlaybackStatus::Idle,
            session: None,
            progress: 0.0,
            rate_chosen: false,
            selection: VoiceSelection::default(),
            catalog: VoiceCatalog::default(),
            preferences: None,
            next_utterance: UtteranceId::new(1),
            ticker: None,
            engine_rx,
            tick_tx,
            tick_rx,
            event_tx,
        };

        (controller, event_rx)
    }

    // ── Initialization ─────────────────────────────────────────────

    /// Refresh the voice catalog, restore saved preferences, and resolve the
    /// voice to use.
    ///
    /// Safe to call repeatedly: preferences are read only on the first call,
    /// and a later call only ever refines the voice selection. An explicit
    /// user choice is never replaced.
    pub fn initialize(&mut self) {
        self.catalog = VoiceCatalog::new(self.engine.voices());
        tracing::debug!(voices = self.catalog.len(), "Voice catalog refreshed");
        self.emit(PlaybackEvent::VoicesUpdated(self.catalog.len()));

        if self.preferences.is_none() {
            let prefs = Preferences::load(self.store.as_ref());
            if let Some(rate) = prefs.rate {
                if !self.rate_chosen && (rate - self.rate).abs() > f32::EPSILON {
                    tracing::debug!(rate, "Restored saved speech rate");
                    self.rate = rate;
                    self.emit(PlaybackEvent::RateChanged(rate));
                }
            }
            self.preferences = Some(prefs);
        }

        let saved_id = self
            .preferences
            .as_ref()
            .and_then(|p| p.voice_id.clone());

        match catalog::resolve(&self.catalog, saved_id.as_deref(), &self.selection) {
            Resolution::Keep => {}
            Resolution::Select(selection) => {
                tracing::info!(
                    voice = selection.voice_id().unwrap_or_default(),
                    source = ?selection.source(),
                    "Voice selected"
                );
                self.selection = selection;
                self.emit(PlaybackEvent::VoiceChanged(
                    self.selection.voice_id().map(str::to_string),
                ));
            }
            Resolution::NoVoiceAvailable => {
                tracing::warn!("No voices available yet, using the engine default");
            }
        }
    }

    // ── Session control ────────────────────────────────────────────

    /// Start reading `article`, replacing any current session.
    ///
    /// Returns `Ok(false)` without touching the current session when the
    /// article has no summary to read. A replaced session ends silently.
    ///
    /// # Panics
    ///
    /// Arms the progress ticker with `tokio::spawn`, so it panics when called
    /// outside a tokio runtime.
    pub fn start(&mut self, article: Article) -> Result<bool, PlaybackError> {
        let Some(text) = article.speech_text() else {
            tracing::debug!(article_id = %article.id, "Article has no summary, nothing to read");
            return Ok(false);
        };

        self.halt();
        self.launch(article, text)?;
        Ok(true)
    }

    /// Pause the active reading. No-op unless playing.
    pub fn pause(&mut self) {
        if self.status != PlaybackStatus::Playing {
            tracing::debug!(status = %self.status, "Pause ignored");
            return;
        }

        self.engine.pause();
        self.ticker = None;
        self.set_state(PlaybackStatus::Paused);
    }

    /// Resume a paused reading. No-op unless paused.
    ///
    /// # Panics
    ///
    /// Re-arms the progress ticker, so it panics when called outside a tokio
    /// runtime.
    pub fn resume(&mut self) {
        if self.status != PlaybackStatus::Paused {
            tracing::debug!(status = %self.status, "Resume ignored");
            return;
        }

        self.engine.resume();
        if let Some(utterance) = self.session.as_ref().map(|s| s.utterance) {
            self.arm_ticker(utterance);
        }
        self.set_state(PlaybackStatus::Playing);
    }

    /// Stop reading and return to idle. Idempotent.
    pub fn stop(&mut self) {
        if let Some(session) = &self.session {
            tracing::info!(article_id = %session.article.id, "Playback stopped");
        }
        self.halt();
        self.set_progress(0.0);
        self.set_state(PlaybackStatus::Idle);
    }

    /// Change the speech rate and remember it.
    ///
    /// An active reading restarts from the beginning at the new rate, since
    /// engines cannot change rate mid-utterance.
    ///
    /// # Panics
    ///
    /// Like [`start`](Self::start), restarting an active reading panics
    /// outside a tokio runtime.
    pub fn change_rate(&mut self, rate: f32) -> Result<(), PlaybackError> {
        if !is_valid_rate(rate) {
            return Err(PlaybackError::InvalidRate(rate));
        }

        tracing::info!(rate, "Speech rate changed");
        self.rate = rate;
        self.rate_chosen = true;
        self.persist(RATE_KEY, &rate.to_string());
        self.emit(PlaybackEvent::RateChanged(rate));
        self.restart_if_active()
    }

    /// Change the voice and remember it.
    ///
    /// An active reading restarts from the beginning with the new voice.
    ///
    /// # Panics
    ///
    /// Like [`start`](Self::start), restarting an active reading panics
    /// outside a tokio runtime.
    pub fn change_voice(&mut self, voice: VoiceDescriptor) -> Result<(), PlaybackError> {
        tracing::info!(voice = %voice.id, "Voice changed");
        self.persist(VOICE_KEY, &voice.id);
        if let Some(prefs) = self.preferences.as_mut() {
            prefs.voice_id = Some(voice.id.clone());
        }
        self.emit(PlaybackEvent::VoiceChanged(Some(voice.id.clone())));
        self.selection = VoiceSelection::user(voice);
        self.restart_if_active()
    }

    /// [`change_voice`](Self::change_voice) by id, looked up in the catalog.
    pub fn change_voice_by_id(&mut self, id: &str) -> Result<(), PlaybackError> {
        let voice = self
            .catalog
            .find(id)
            .cloned()
            .ok_or_else(|| PlaybackError::UnknownVoice(id.to_string()))?;
        self.change_voice(voice)
    }

    // ── Accessors ──────────────────────────────────────────────────

    pub const fn status(&self) -> PlaybackStatus {
        self.status
    }

    /// Estimated progress through the current reading, 0–100.
    pub const fn progress_percent(&self) -> f64 {
        self.progress
    }

    pub const fn rate(&self) -> f32 {
        self.rate
    }

    pub const fn voice(&self) -> Option<&VoiceDescriptor> {
        self.selection.voice()
    }

    pub const fn voice_source(&self) -> VoiceSource {
        self.selection.source()
    }

    pub fn current_article(&self) -> Option<&Article> {
        self.session.as_ref().map(|s| &s.article)
    }

    pub fn available_voices(&self) -> &[VoiceDescriptor] {
        self.catalog.voices()
    }

    /// Voices offered by the picker: English only, in catalog order.
    pub fn english_voices(&self) -> Vec<VoiceDescriptor> {
        self.catalog.english().cloned().collect()
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            status: self.status,
            article: self.current_article().cloned(),
            rate: self.rate,
            voice: self.voice().cloned(),
            available_voices: self.catalog.voices().to_vec(),
            progress_percent: self.progress,
        }
    }

    // ── Inbound queues ─────────────────────────────────────────────

    /// Handle everything already queued, without waiting. Engine events are
    /// handled before ticks. Returns the number of messages handled.
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        loop {
            if let Ok(event) = self.engine_rx.try_recv() {
                self.handle_engine_event(event);
            } else if let Ok(tick) = self.tick_rx.try_recv() {
                self.handle_tick(tick);
            } else {
                return handled;
            }
            handled += 1;
        }
    }

    /// Wait for the next inbound message.
    ///
    /// The controller holds its own tick sender, so the tick queue never
    /// closes. An engine that drops its event sink only silences engine
    /// events; the wait then continues on ticks.
    pub async fn next_inbound(&mut self) -> Inbound {
        tokio::select! {
            biased;
            Some(event) = self.engine_rx.recv() => Inbound::Engine(event),
            Some(tick) = self.tick_rx.recv() => Inbound::Tick(tick),
            else => std::future::pending().await,
        }
    }

    /// Handle one inbound message.
    pub fn dispatch(&mut self, inbound: Inbound) {
        match inbound {
            Inbound::Engine(event) => self.handle_engine_event(event),
            Inbound::Tick(tick) => self.handle_tick(tick),
        }
    }

    /// Wait for one inbound message, then handle it and anything queued
    /// behind it.
    pub async fn pump(&mut self) {
        let inbound = self.next_inbound().await;
        self.dispatch(inbound);
        self.process_pending();
    }

    fn handle_engine_event(&mut self, event: EngineEvent) {
        if let Some(utterance) = event.utterance() {
            if !self.is_current(utterance) {
                tracing::debug!(%utterance, ?event, "Dropping event for superseded utterance");
                return;
            }
        }

        match event {
            EngineEvent::VoicesChanged => {
                tracing::debug!("Engine voices changed");
                self.initialize();
            }
            EngineEvent::Started(utterance) => {
                tracing::debug!(%utterance, "Speech started");
                self.emit(PlaybackEvent::SpeechStarted);
            }
            EngineEvent::Ended(_) => self.finish(),
            EngineEvent::Error { utterance, message } => {
                tracing::warn!(%utterance, error = %message, "Speech engine error");
                self.fail(message);
            }
        }
    }

    fn handle_tick(&mut self, Tick(utterance): Tick) {
        if self.status != PlaybackStatus::Playing {
            return;
        }
        let Some(session) = self.session.as_ref().filter(|s| s.utterance == utterance) else {
            return;
        };
        if !self.engine.is_speaking() || self.engine.is_paused() {
            return;
        }

        let step = progress::progress_step(session.text_chars, self.config.progress_chars_factor);
        self.set_progress(progress::advance(self.progress, step));
    }

    // ── Internals ──────────────────────────────────────────────────

    fn is_current(&self, utterance: UtteranceId) -> bool {
        self.session.as_ref().is_some_and(|s| s.utterance == utterance)
    }

    /// Tear down the current session without reporting it as ended.
    fn halt(&mut self) {
        self.ticker = None;
        self.engine.cancel();
        self.session = None;
    }

    fn launch(&mut self, article: Article, text: String) -> Result<(), PlaybackError> {
        let utterance = self.next_utterance;
        self.next_utterance = utterance.next();

        let request = UtteranceRequest {
            id: utterance,
            text: text.clone(),
            rate: self.rate,
            pitch: self.config.pitch,
            volume: self.config.volume,
            voice: self.selection.voice().cloned(),
        };

        self.session = Some(Session {
            utterance,
            text_chars: text.chars().count(),
            article,
            text,
        });
        self.set_progress(0.0);

        if let Err(e) = self.engine.speak(request) {
            tracing::warn!(%utterance, error = %e, "Speech engine rejected utterance");
            self.fail(e.to_string());
            return Err(e.into());
        }

        self.arm_ticker(utterance);
        self.set_state(PlaybackStatus::Playing);

        if let Some(session) = &self.session {
            tracing::info!(
                %utterance,
                article_id = %session.article.id,
                rate = self.rate,
                voice = self.selection.voice_id().unwrap_or("default"),
                "Reading article"
            );
            self.emit(PlaybackEvent::SessionStarted {
                article_id: session.article.id.clone(),
                title: session.article.title.clone(),
            });
        }
        Ok(())
    }

    fn restart_if_active(&mut self) -> Result<(), PlaybackError> {
        if !self.status.is_active() {
            return Ok(());
        }
        let Some(session) = self.session.take() else {
            return Ok(());
        };

        tracing::debug!(article_id = %session.article.id, "Restarting with new parameters");
        self.halt();
        self.launch(session.article, session.text)
    }

    fn arm_ticker(&mut self, utterance: UtteranceId) {
        self.ticker = Some(ProgressTicker::arm(
            utterance,
            self.config.tick_interval(),
            self.tick_tx.clone(),
        ));
    }

    fn finish(&mut self) {
        self.ticker = None;
        self.set_progress(PROGRESS_MAX);
        self.set_state(PlaybackStatus::Ended);
        if let Some(session) = &self.session {
            tracing::info!(article_id = %session.article.id, "Finished reading article");
            self.emit(PlaybackEvent::Finished {
                article_id: session.article.id.clone(),
            });
        }
        self.normalize();
    }

    fn fail(&mut self, message: String) {
        self.ticker = None;
        self.set_state(PlaybackStatus::Failed);
        if let Some(session) = &self.session {
            self.emit(PlaybackEvent::Failed {
                article_id: session.article.id.clone(),
                message,
            });
        }
        self.normalize();
    }

    /// Return from a terminal state to idle.
    fn normalize(&mut self) {
        self.session = None;
        self.set_progress(0.0);
        self.set_state(PlaybackStatus::Idle);
    }

    fn persist(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            tracing::warn!(key, error = %e, "Failed to save preference");
        }
    }

    fn set_progress(&mut self, progress: f64) {
        if (self.progress - progress).abs() > f64::EPSILON {
            self.progress = progress;
            self.emit(PlaybackEvent::Progress(progress));
        }
    }

    fn set_state(&mut self, new_state: PlaybackStatus) {
        if self.status != new_state {
            tracing::debug!(old = %self.status, new = %new_state, "Playback state transition");
            self.status = new_state;
            self.emit(PlaybackEvent::StateChanged(new_state));
        }
    }

    /// Emit a playback event. A dropped receiver is logged and otherwise ignored.
    fn emit(&self, event: PlaybackEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::warn!("Playback event receiver dropped");
        }
    }
}

impl fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackController")
            .field("status", &self.status)
            .field("progress", &self.progress)
            .field("rate", &self.rate)
            .field("voice", &self.selection.voice_id())
            .field("session", &self.session.as_ref().map(|s| s.utterance))
            .finish_non_exhaustive()
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryPreferenceStore;
    use std::sync::Mutex;

    /// Engine that accepts everything and records calls.
    #[derive(Default)]
    struct RecordingEngine {
        log: Arc<Mutex<Vec<String>>>,
        speaking: bool,
        paused: bool,
    }

    impl SpeechEngine for RecordingEngine {
        fn attach(&mut self, _events: EngineEventSink) {}

        fn voices(&self) -> Vec<VoiceDescriptor> {
            vec![VoiceDescriptor::new("v1", "Samantha", "en-US").as_default()]
        }

        fn speak(&mut self, request: UtteranceRequest) -> Result<(), briefly_core::EngineError> {
            self.log.lock().unwrap().push(format!("speak {}", request.id));
            self.speaking = true;
            self.paused = false;
            Ok(())
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn resume(&mut self) {
            self.paused = false;
        }

        fn cancel(&mut self) {
            self.log.lock().unwrap().push("cancel".into());
            self.speaking = false;
            self.paused = false;
        }

        fn is_speaking(&self) -> bool {
            self.speaking
        }

        fn is_paused(&self) -> bool {
            self.paused
        }
    }

    fn controller() -> (PlaybackController, mpsc::UnboundedReceiver<PlaybackEvent>) {
        PlaybackController::new(
            Box::new(RecordingEngine::default()),
            Arc::new(MemoryPreferenceStore::new()),
            PlaybackConfig::default(),
        )
    }

    fn article() -> Article {
        Article::new("a1", "Rates hold").with_summary("The central bank held rates.")
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&PlaybackStatus::Paused).unwrap();
        assert_eq!(json, "\"paused\"");
        assert!(PlaybackStatus::Paused.is_active());
        assert!(!PlaybackStatus::Ended.is_active());
    }

    #[test]
    fn snapshot_uses_camel_case() {
        let value = serde_json::to_value(PlaybackSnapshot::default()).unwrap();
        assert!(value.get("progressPercent").is_some());
        assert!(value.get("availableVoices").is_some());
    }

    #[tokio::test]
    async fn new_controller_is_idle() {
        let (ctl, _events) = controller();
        assert_eq!(ctl.status(), PlaybackStatus::Idle);
        assert!(ctl.current_article().is_none());
        assert!(ctl.progress_percent().abs() < f64::EPSILON);
        assert!((ctl.rate() - 1.0).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn start_without_summary_is_a_no_op() {
        let (mut ctl, _events) = controller();
        let started = ctl.start(Article::new("a2", "No summary")).unwrap();
        assert!(!started);
        assert_eq!(ctl.status(), PlaybackStatus::Idle);
    }

    #[tokio::test]
    async fn stale_events_are_dropped() {
        let (mut ctl, _events) = controller();
        ctl.start(article()).unwrap();
        ctl.start(article()).unwrap();

        // utt-1 was superseded by utt-2.
        ctl.handle_engine_event(EngineEvent::Ended(UtteranceId::new(1)));
        assert_eq!(ctl.status(), PlaybackStatus::Playing);

        ctl.handle_engine_event(EngineEvent::Ended(UtteranceId::new(2)));
        assert_eq!(ctl.status(), PlaybackStatus::Idle);
    }

    #[tokio::test]
    async fn pause_and_resume_only_apply_in_matching_state() {
        let (mut ctl, _events) = controller();
        ctl.resume();
        assert_eq!(ctl.status(), PlaybackStatus::Idle);

        ctl.start(article()).unwrap();
        ctl.resume();
        assert_eq!(ctl.status(), PlaybackStatus::Playing);

        ctl.pause();
        ctl.pause();
        assert_eq!(ctl.status(), PlaybackStatus::Paused);
        assert!(ctl.ticker.is_none());

        ctl.resume();
        assert_eq!(ctl.status(), PlaybackStatus::Playing);
        assert!(ctl.ticker.is_some());
    }

    #[tokio::test]
    async fn ticks_for_old_utterances_are_ignored() {
        let (mut ctl, _events) = controller();
        ctl.start(article()).unwrap();
        ctl.start(article()).unwrap();

        ctl.handle_tick(Tick(UtteranceId::new(1)));
        assert!(ctl.progress_percent().abs() < f64::EPSILON);

        ctl.handle_tick(Tick(UtteranceId::new(2)));
        assert!(ctl.progress_percent() > 0.0);
    }

    #[tokio::test]
    async fn drop_stops_playback() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let engine = RecordingEngine {
            log: Arc::clone(&log),
            ..RecordingEngine::default()
        };
        let (mut ctl, _events) = PlaybackController::new(
            Box::new(engine),
            Arc::new(MemoryPreferenceStore::new()),
            PlaybackConfig::default(),
        );
        ctl.start(article()).unwrap();
        drop(ctl);

        let log = log.lock().unwrap();
        assert_eq!(log.last().map(String::as_str), Some("cancel"));
    }
}
