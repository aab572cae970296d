//! Playback service: runs a [`PlaybackController`] on its own tokio task.
//!
//! Presentation code talks to the controller through a cloneable
//! [`PlaybackHandle`]: commands go over an `mpsc` channel with `oneshot`
//! replies, and the latest [`PlaybackSnapshot`] is published on a `watch`
//! channel after every command and every engine event or tick.

use briefly_core::{Article, VoiceDescriptor};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::controller::{Inbound, PlaybackController, PlaybackSnapshot};
use crate::error::PlaybackError;

const COMMAND_QUEUE_DEPTH: usize = 32;

// ── Commands ───────────────────────────────────────────────────────

/// A command sent from a handle to the service task.
enum PlaybackCommand {
    Initialize {
        reply: oneshot::Sender<()>,
    },
    Start {
        article: Box<Article>,
        reply: oneshot::Sender<Result<bool, PlaybackError>>,
    },
    Pause {
        reply: oneshot::Sender<()>,
    },
    Resume {
        reply: oneshot::Sender<()>,
    },
    Stop {
        reply: oneshot::Sender<()>,
    },
    ChangeRate {
        rate: f32,
        reply: oneshot::Sender<Result<(), PlaybackError>>,
    },
    ChangeVoice {
        voice: VoiceDescriptor,
        reply: oneshot::Sender<Result<(), PlaybackError>>,
    },
    ChangeVoiceById {
        id: String,
        reply: oneshot::Sender<Result<(), PlaybackError>>,
    },
    EnglishVoices {
        reply: oneshot::Sender<Vec<VoiceDescriptor>>,
    },
    Shutdown,
}

/// What woke the service loop.
enum Wake {
    Command(Option<PlaybackCommand>),
    Inbound(Inbound),
}

// ── Handle ─────────────────────────────────────────────────────────

/// Cloneable proxy to the playback service task.
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    cmd_tx: mpsc::Sender<PlaybackCommand>,
    snapshot_rx: watch::Receiver<PlaybackSnapshot>,
}

impl PlaybackHandle {
    pub async fn initialize(&self) -> Result<(), PlaybackError> {
        self.request(|reply| PlaybackCommand::Initialize { reply })
            .await
    }

    /// Start reading `article`. `Ok(false)` if it had nothing to read.
    pub async fn start(&self, article: Article) -> Result<bool, PlaybackError> {
        self.request(|reply| PlaybackCommand::Start {
            article: Box::new(article),
            reply,
        })
        .await?
    }

    pub async fn pause(&self) -> Result<(), PlaybackError> {
        self.request(|reply| PlaybackCommand::Pause { reply }).await
    }

    pub async fn resume(&self) -> Result<(), PlaybackError> {
        self.request(|reply| PlaybackCommand::Resume { reply }).await
    }

    pub async fn stop(&self) -> Result<(), PlaybackError> {
        self.request(|reply| PlaybackCommand::Stop { reply }).await
    }

    pub async fn change_rate(&self, rate: f32) -> Result<(), PlaybackError> {
        self.request(|reply| PlaybackCommand::ChangeRate { rate, reply })
            .await?
    }

    pub async fn change_voice(&self, voice: VoiceDescriptor) -> Result<(), PlaybackError> {
        self.request(|reply| PlaybackCommand::ChangeVoice { voice, reply })
            .await?
    }

    pub async fn change_voice_by_id(&self, id: &str) -> Result<(), PlaybackError> {
        self.request(|reply| PlaybackCommand::ChangeVoiceById {
            id: id.to_string(),
            reply,
        })
        .await?
    }

    pub async fn english_voices(&self) -> Result<Vec<VoiceDescriptor>, PlaybackError> {
        self.request(|reply| PlaybackCommand::EnglishVoices { reply })
            .await
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Receiver that is notified whenever a new snapshot is published.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.snapshot_rx.clone()
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> PlaybackCommand,
    ) -> Result<T, PlaybackError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(build(tx))
            .await
            .map_err(|_| PlaybackError::ServiceStopped)?;
        rx.await.map_err(|_| PlaybackError::ServiceStopped)
    }
}

// ── Service ────────────────────────────────────────────────────────

/// Owner of the service task.
#[derive(Debug)]
pub struct PlaybackService {
    handle: PlaybackHandle,
    task: JoinHandle<()>,
}

impl PlaybackService {
    /// Move `controller` onto a new task and return the service.
    ///
    /// Must be called from within a tokio runtime. The task ends on
    /// [`shutdown`](Self::shutdown) or once every handle has been dropped;
    /// either way playback is stopped first.
    pub fn spawn(controller: PlaybackController) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        let (snapshot_tx, snapshot_rx) = watch::channel(controller.snapshot());

        let task = tokio::spawn(Self::run(controller, cmd_rx, snapshot_tx));

        Self {
            handle: PlaybackHandle {
                cmd_tx,
                snapshot_rx,
            },
            task,
        }
    }

    pub fn handle(&self) -> PlaybackHandle {
        self.handle.clone()
    }

    /// Stop playback, end the task, and wait for it to finish.
    pub async fn shutdown(self) {
        let _ = self.handle.cmd_tx.send(PlaybackCommand::Shutdown).await;
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "Playback service task failed");
        }
    }

    // ── Service event loop ─────────────────────────────────────────

    async fn run(
        mut controller: PlaybackController,
        mut cmd_rx: mpsc::Receiver<PlaybackCommand>,
        snapshot_tx: watch::Sender<PlaybackSnapshot>,
    ) {
        tracing::debug!("Playback service started");

        loop {
            let wake = tokio::select! {
                cmd = cmd_rx.recv() => Wake::Command(cmd),
                inbound = controller.next_inbound() => Wake::Inbound(inbound),
            };

            match wake {
                Wake::Command(None | Some(PlaybackCommand::Shutdown)) => break,
                Wake::Command(Some(cmd)) => Self::execute(&mut controller, cmd, &snapshot_tx),
                Wake::Inbound(inbound) => {
                    controller.dispatch(inbound);
                    controller.process_pending();
                    snapshot_tx.send_replace(controller.snapshot());
                }
            }
        }

        controller.stop();
        snapshot_tx.send_replace(controller.snapshot());
        tracing::debug!("Playback service stopped");
    }

    fn execute(
        controller: &mut PlaybackController,
        cmd: PlaybackCommand,
        snapshot_tx: &watch::Sender<PlaybackSnapshot>,
    ) {
        match cmd {
            PlaybackCommand::Initialize { reply } => {
                controller.initialize();
                Self::respond(controller, snapshot_tx, reply, ());
            }
            PlaybackCommand::Start { article, reply } => {
                let result = controller.start(*article);
                Self::respond(controller, snapshot_tx, reply, result);
            }
            PlaybackCommand::Pause { reply } => {
                controller.pause();
                Self::respond(controller, snapshot_tx, reply, ());
            }
            PlaybackCommand::Resume { reply } => {
                controller.resume();
                Self::respond(controller, snapshot_tx, reply, ());
            }
            PlaybackCommand::Stop { reply } => {
                controller.stop();
                Self::respond(controller, snapshot_tx, reply, ());
            }
            PlaybackCommand::ChangeRate { rate, reply } => {
                let result = controller.change_rate(rate);
                Self::respond(controller, snapshot_tx, reply, result);
            }
            PlaybackCommand::ChangeVoice { voice, reply } => {
                let result = controller.change_voice(voice);
                Self::respond(controller, snapshot_tx, reply, result);
            }
            PlaybackCommand::ChangeVoiceById { id, reply } => {
                let result = controller.change_voice_by_id(&id);
                Self::respond(controller, snapshot_tx, reply, result);
            }
            PlaybackCommand::EnglishVoices { reply } => {
                let voices = controller.english_voices();
                Self::respond(controller, snapshot_tx, reply, voices);
            }
            PlaybackCommand::Shutdown => {}
        }
    }

    /// Publish the snapshot first so a caller woken by the reply already sees
    /// the command's effect.
    fn respond<T>(
        controller: &PlaybackController,
        snapshot_tx: &watch::Sender<PlaybackSnapshot>,
        reply: oneshot::Sender<T>,
        value: T,
    ) {
        snapshot_tx.send_replace(controller.snapshot());
        // A caller that stopped waiting for its reply is not an error.
        let _ = reply.send(value);
    }
}
