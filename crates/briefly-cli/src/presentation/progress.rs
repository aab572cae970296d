//! Playback progress display.
//!
//! A terminal gets an `indicatif` bar that follows `Progress` events. Any
//! other output gets one plain line per 10% step, so piped sessions stay
//! readable in logs.

use std::io::{self, IsTerminal};

use briefly_tts::PlaybackEvent;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const BAR_LENGTH: u64 = 100;

// ── Progress display ───────────────────────────────────────────────

/// Renders playback events, choosing a bar or plain lines for the output.
pub struct PlaybackProgress {
    inner: ProgressRender,
}

enum ProgressRender {
    Fancy(FancyProgress),
    Plain(PlainProgress),
}

impl PlaybackProgress {
    /// Bar when stdout is a terminal, plain lines otherwise.
    pub fn new() -> Self {
        if io::stdout().is_terminal() {
            Self {
                inner: ProgressRender::Fancy(FancyProgress::new(ProgressDrawTarget::stdout())),
            }
        } else {
            Self::plain()
        }
    }

    /// Plain line output regardless of the terminal.
    pub fn plain() -> Self {
        Self {
            inner: ProgressRender::Plain(PlainProgress::default()),
        }
    }

    /// Render one playback event.
    pub fn handle(&mut self, event: &PlaybackEvent) {
        match event {
            PlaybackEvent::Progress(percent) => match &mut self.inner {
                ProgressRender::Fancy(inner) => inner.update(*percent),
                ProgressRender::Plain(inner) => {
                    if let Some(line) = inner.update(*percent) {
                        println!("{line}");
                    }
                }
            },
            PlaybackEvent::SessionStarted { title, .. } => {
                match &mut self.inner {
                    ProgressRender::Fancy(inner) => inner.restart(title),
                    ProgressRender::Plain(inner) => inner.restart(),
                }
                self.println(&format!("Reading \"{title}\""));
            }
            other => {
                if let Some(line) = event_line(other) {
                    self.println(&line);
                }
            }
        }
    }

    /// Print a line without tearing the bar.
    pub fn println(&self, line: &str) {
        match &self.inner {
            ProgressRender::Fancy(inner) => inner.bar.println(line),
            ProgressRender::Plain(_) => println!("{line}"),
        }
    }

    /// Remove the bar from the terminal.
    pub fn finish(&self) {
        if let ProgressRender::Fancy(inner) = &self.inner {
            inner.bar.finish_and_clear();
        }
    }
}

impl Default for PlaybackProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Text for a status-style event, if it is worth showing. Progress and
/// session starts are rendered by [`PlaybackProgress`] itself.
fn event_line(event: &PlaybackEvent) -> Option<String> {
    match event {
        PlaybackEvent::StateChanged(status) => Some(format!("[{status}]")),
        PlaybackEvent::Finished { .. } => Some("Finished.".to_string()),
        PlaybackEvent::Failed { message, .. } => Some(format!("Playback failed: {message}")),
        PlaybackEvent::RateChanged(rate) => Some(format!("Rate set to {rate}x")),
        PlaybackEvent::VoiceChanged(Some(id)) => Some(format!("Voice set to {id}")),
        PlaybackEvent::Progress(_)
        | PlaybackEvent::SessionStarted { .. }
        | PlaybackEvent::VoiceChanged(None)
        | PlaybackEvent::SpeechStarted
        | PlaybackEvent::VoicesUpdated(_) => None,
    }
}

/// Bar position for a progress percentage.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bar_position(percent: f64) -> u64 {
    percent.clamp(0.0, 100.0).round() as u64
}

// ── Terminal bar (indicatif) ───────────────────────────────────────

struct FancyProgress {
    bar: ProgressBar,
}

impl FancyProgress {
    fn new(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(BAR_LENGTH), target);
        bar.set_style(Self::bar_style());
        Self { bar }
    }

    fn update(&self, percent: f64) {
        self.bar.set_position(bar_position(percent));
    }

    fn restart(&self, title: &str) {
        self.bar.reset();
        self.bar.set_message(title.to_string());
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("🔊 {wide_msg} {bar:30.cyan/blue} {pos:>3}%")
            .map_or_else(|_| ProgressStyle::default_bar(), |style| style.progress_chars("#>-"))
    }
}

// ── Plain lines (non-terminal) ─────────────────────────────────────

/// Emits a line only when progress crosses a 10% boundary.
#[derive(Debug, Default)]
struct PlainProgress {
    last_bucket: Option<u64>,
}

impl PlainProgress {
    fn update(&mut self, percent: f64) -> Option<String> {
        if percent <= 0.0 {
            return None;
        }
        let bucket = bar_position(percent) / 10;
        if self.last_bucket == Some(bucket) {
            return None;
        }
        self.last_bucket = Some(bucket);
        Some(format!("Progress {:>3}%", bar_position(percent)))
    }

    const fn restart(&mut self) {
        self.last_bucket = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use briefly_tts::PlaybackStatus;

    #[test]
    fn plain_progress_prints_once_per_decile() {
        let mut plain = PlainProgress::default();
        assert!(plain.update(0.0).is_none());
        assert_eq!(plain.update(12.0).as_deref(), Some("Progress  12%"));
        assert!(plain.update(15.0).is_none());
        assert!(plain.update(21.0).is_some());

        plain.restart();
        assert!(plain.update(22.0).is_some());
    }

    #[test]
    fn bar_follows_progress_events() {
        let mut progress = PlaybackProgress {
            inner: ProgressRender::Fancy(FancyProgress::new(ProgressDrawTarget::hidden())),
        };
        let ProgressRender::Fancy(inner) = &progress.inner else {
            panic!("expected the bar renderer");
        };
        let bar = inner.bar.clone();

        progress.handle(&PlaybackEvent::Progress(42.4));
        assert_eq!(bar.position(), 42);
        progress.handle(&PlaybackEvent::Progress(250.0));
        assert_eq!(bar.position(), 100);
        assert_eq!(bar.length(), Some(BAR_LENGTH));

        progress.handle(&PlaybackEvent::SessionStarted {
            article_id: "a1".into(),
            title: "Rates hold".into(),
        });
        assert_eq!(bar.position(), 0);
        assert_eq!(bar.message(), "Rates hold");
    }

    #[test]
    fn status_events_have_lines() {
        assert_eq!(
            event_line(&PlaybackEvent::StateChanged(PlaybackStatus::Paused)).as_deref(),
            Some("[paused]")
        );
        assert_eq!(
            event_line(&PlaybackEvent::Finished {
                article_id: "a1".into()
            })
            .as_deref(),
            Some("Finished.")
        );
        assert!(event_line(&PlaybackEvent::SpeechStarted).is_none());
        assert!(event_line(&PlaybackEvent::Progress(50.0)).is_none());
    }
}
