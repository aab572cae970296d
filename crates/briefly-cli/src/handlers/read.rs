//! Read command handler.
//!
//! Loads an article and runs an interactive read-aloud session. Playback
//! events are rendered as they arrive; commands are read line by line from
//! stdin until the article finishes, the user quits, or stdin closes with
//! nothing left playing.

use std::path::Path;

use anyhow::Result;
use briefly_core::Article;
use briefly_tts::{PlaybackEvent, PlaybackHandle, PlaybackService, PlaybackStatus};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{PlaybackProgress, print_separator, status_line, voice_row};

/// Arguments for the read command.
#[derive(Debug, Clone)]
pub struct ReadArgs {
    pub article: String,
    pub rate: Option<f32>,
    pub voice: Option<String>,
}

/// A line typed during a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Play,
    Pause,
    Resume,
    Stop,
    Rate(f32),
    Voice(String),
    Voices,
    Status,
    Help,
    Quit,
}

/// Whether the session loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Done,
}

const HELP: &str = "Commands: play, pause, resume, stop, rate <R>, voice <ID>, voices, status, quit";

/// Parse one input line.
pub fn parse_session_command(line: &str) -> Result<SessionCommand, String> {
    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        return Err(HELP.to_string());
    };
    let arg = parts.next();

    match (word.to_ascii_lowercase().as_str(), arg) {
        ("play" | "restart", None) => Ok(SessionCommand::Play),
        ("pause" | "p", None) => Ok(SessionCommand::Pause),
        ("resume" | "r", None) => Ok(SessionCommand::Resume),
        ("stop" | "s", None) => Ok(SessionCommand::Stop),
        ("rate" | "speed", Some(raw)) => raw
            .trim_end_matches('x')
            .parse::<f32>()
            .map(SessionCommand::Rate)
            .map_err(|_| format!("Not a number: {raw}")),
        ("voice", Some(id)) => Ok(SessionCommand::Voice(id.to_string())),
        ("voices", None) => Ok(SessionCommand::Voices),
        ("status", None) => Ok(SessionCommand::Status),
        ("help" | "?", None) => Ok(SessionCommand::Help),
        ("quit" | "q" | "exit", None) => Ok(SessionCommand::Quit),
        _ => Err(format!("Unknown command '{}'. {HELP}", line.trim())),
    }
}

/// Load the article to read from a JSON file.
///
/// Accepts a single article object or an array, in which case the first
/// article with a readable summary is used.
pub fn load_article(path: &Path) -> Result<Article> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        CliError::Io(format!("Failed to read article file {}: {e}", path.display()))
    })?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|e| CliError::Input(format!("Invalid JSON in {}: {e}", path.display())))?;

    let article = if value.is_array() {
        let articles: Vec<Article> = serde_json::from_value(value)
            .map_err(|e| CliError::Input(format!("Not a list of articles: {e}")))?;
        articles
            .into_iter()
            .find(|a| a.speech_text().is_some())
            .ok_or_else(|| CliError::Input("No article in the list has a summary".into()))?
    } else {
        serde_json::from_value(value)
            .map_err(|e| CliError::Input(format!("Not an article: {e}")))?
    };
    Ok(article)
}

/// Execute the read command.
pub async fn execute(ctx: &CliContext, args: ReadArgs) -> Result<()> {
    let article = load_article(Path::new(&args.article))?;
    if article.speech_text().is_none() {
        println!("\"{}\" has no summary to read.", article.title);
        return Ok(());
    }

    let (controller, mut events) = ctx.controller();
    let service = PlaybackService::spawn(controller);
    let handle = service.handle();

    handle.initialize().await?;
    if let Some(rate) = args.rate {
        handle.change_rate(rate).await.map_err(CliError::from)?;
    }
    if let Some(voice) = args.voice.as_deref() {
        handle.change_voice_by_id(voice).await.map_err(CliError::from)?;
    }

    handle.start(article.clone()).await?;

    let mut progress = PlaybackProgress::new();
    progress.println(HELP);
    let stdin = BufReader::new(tokio::io::stdin());
    let outcome = run_session(&handle, &article, &mut events, stdin, &mut progress).await;

    service.shutdown().await;
    outcome
}

/// Render events and apply commands read from `input` until the article
/// finishes or fails, the user quits, or `input` closes while nothing is
/// playing.
pub async fn run_session<R>(
    handle: &PlaybackHandle,
    article: &Article,
    events: &mut UnboundedReceiver<PlaybackEvent>,
    input: R,
    progress: &mut PlaybackProgress,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut input_open = true;

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                progress.handle(&event);
                if matches!(event, PlaybackEvent::Finished { .. } | PlaybackEvent::Failed { .. }) {
                    break;
                }
            }
            line = lines.next_line(), if input_open => {
                match line? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => match parse_session_command(&line) {
                        Ok(command) => {
                            if run_command(handle, article, command).await? == Flow::Done {
                                break;
                            }
                        }
                        Err(message) => progress.println(&message),
                    },
                    None => input_open = false,
                }
                // Without input nothing can resume a paused or stopped session.
                if !input_open && handle.snapshot().status != PlaybackStatus::Playing {
                    break;
                }
            }
        }
    }

    progress.finish();
    Ok(())
}

/// Apply one session command.
pub async fn run_command(
    handle: &PlaybackHandle,
    article: &Article,
    command: SessionCommand,
) -> Result<Flow> {
    match command {
        SessionCommand::Play => {
            handle.start(article.clone()).await?;
        }
        SessionCommand::Pause => handle.pause().await?,
        SessionCommand::Resume => handle.resume().await?,
        SessionCommand::Stop => handle.stop().await?,
        SessionCommand::Rate(rate) => {
            if let Err(e) = handle.change_rate(rate).await {
                println!("{e}");
            }
        }
        SessionCommand::Voice(id) => {
            if let Err(e) = handle.change_voice_by_id(&id).await {
                println!("{e}");
            }
        }
        SessionCommand::Voices => {
            let selected = handle.snapshot().voice.map(|v| v.id);
            print_separator(50);
            for voice in handle.english_voices().await? {
                println!("{}", voice_row(&voice, selected.as_deref() == Some(voice.id.as_str())));
            }
        }
        SessionCommand::Status => println!("{}", status_line(&handle.snapshot())),
        SessionCommand::Help => println!("{HELP}"),
        SessionCommand::Quit => return Ok(Flow::Done),
    }
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use briefly_tts::{
        MemoryPreferenceStore, PlaybackConfig, PlaybackController, PlaybackStatus,
        SimulatedEngine,
    };

    #[test]
    fn parses_session_commands() {
        assert_eq!(parse_session_command("pause"), Ok(SessionCommand::Pause));
        assert_eq!(parse_session_command("  Resume "), Ok(SessionCommand::Resume));
        assert_eq!(parse_session_command("rate 1.25"), Ok(SessionCommand::Rate(1.25)));
        assert_eq!(parse_session_command("speed 1.5x"), Ok(SessionCommand::Rate(1.5)));
        assert_eq!(
            parse_session_command("voice sim:en-GB:oliver"),
            Ok(SessionCommand::Voice("sim:en-GB:oliver".into()))
        );
        assert_eq!(parse_session_command("q"), Ok(SessionCommand::Quit));
    }

    #[test]
    fn rejects_malformed_commands() {
        assert!(parse_session_command("").is_err());
        assert!(parse_session_command("rate fast").is_err());
        assert!(parse_session_command("rate").is_err());
        assert!(parse_session_command("pause now").is_err());
        assert!(parse_session_command("dance").is_err());
    }

    #[test]
    fn loads_first_readable_article_from_list() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            r#"[
                {"id": "1", "title": "No summary yet"},
                {"id": "2", "title": "Chip exports", "summary": {"executive_summary": "New limits announced."}}
            ]"#,
        )
        .unwrap();

        let article = load_article(file.path()).unwrap();
        assert_eq!(article.id, "2");
    }

    #[test]
    fn rejects_non_article_json() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), r#"{"headline": "missing fields"}"#).unwrap();
        assert!(load_article(file.path()).is_err());
    }

    fn fast_service() -> (PlaybackService, UnboundedReceiver<PlaybackEvent>) {
        let mut config = PlaybackConfig::default();
        config.simulated.chars_per_second = 1_000.0;
        let engine = SimulatedEngine::new(&config.simulated);
        let (controller, events) = PlaybackController::new(
            Box::new(engine),
            Arc::new(MemoryPreferenceStore::new()),
            config,
        );
        (PlaybackService::spawn(controller), events)
    }

    async fn session_with_input(input: &'static [u8]) -> PlaybackStatus {
        let (service, mut events) = fast_service();
        let handle = service.handle();
        handle.initialize().await.unwrap();
        let article = Article::new("a1", "Rates hold").with_summary("The bank held rates.");
        handle.start(article.clone()).await.unwrap();

        let mut progress = PlaybackProgress::plain();
        let session = run_session(&handle, &article, &mut events, input, &mut progress);
        tokio::time::timeout(Duration::from_secs(5), session)
            .await
            .expect("session must end once input closes")
            .unwrap();

        // A round trip orders the read after the service has handled the
        // last engine event.
        handle.english_voices().await.unwrap();
        let status = handle.snapshot().status;
        service.shutdown().await;
        status
    }

    #[tokio::test]
    async fn closed_input_after_stop_ends_the_session() {
        assert_eq!(session_with_input(b"stop\n").await, PlaybackStatus::Idle);
    }

    #[tokio::test]
    async fn closed_input_while_paused_ends_the_session() {
        assert_eq!(session_with_input(b"pause\n").await, PlaybackStatus::Paused);
    }

    #[tokio::test]
    async fn closed_input_while_playing_reads_to_the_end() {
        assert_eq!(session_with_input(b"").await, PlaybackStatus::Idle);
    }

    #[test]
    fn unreadable_article_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_article(&dir.path().join("missing.json")).unwrap_err();
        let cli_err = err.downcast_ref::<CliError>().unwrap();
        assert_eq!(cli_err.exit_code(), 74);
    }

    #[test]
    fn session_commands_drive_the_service() {
        tokio_test::block_on(async {
            let config = PlaybackConfig::default();
            let engine = SimulatedEngine::new(&config.simulated);
            let (controller, _events) = PlaybackController::new(
                Box::new(engine),
                Arc::new(MemoryPreferenceStore::new()),
                config,
            );
            let service = PlaybackService::spawn(controller);
            let handle = service.handle();
            handle.initialize().await.unwrap();

            let article = Article::new("a1", "Rates hold").with_summary("The bank held rates.");
            run_command(&handle, &article, SessionCommand::Play).await.unwrap();
            assert_eq!(handle.snapshot().status, PlaybackStatus::Playing);

            run_command(&handle, &article, SessionCommand::Pause).await.unwrap();
            assert_eq!(handle.snapshot().status, PlaybackStatus::Paused);

            run_command(&handle, &article, SessionCommand::Voice("sim:en-GB:oliver".into()))
                .await
                .unwrap();
            let snapshot = handle.snapshot();
            assert_eq!(snapshot.status, PlaybackStatus::Playing);
            assert_eq!(snapshot.voice.map(|v| v.id), Some("sim:en-GB:oliver".into()));

            let flow = run_command(&handle, &article, SessionCommand::Quit).await.unwrap();
            assert_eq!(flow, Flow::Done);

            service.shutdown().await;
        });
    }
}
