//! Progress estimation for the active utterance.
//!
//! Speech engines expose no playback position, so progress is estimated from
//! elapsed ticks and the text length. A [`ProgressTicker`] owns the periodic
//! task that produces the ticks; the controller applies [`progress_step`] on
//! each one it accepts.

use std::time::Duration;

use briefly_core::UtteranceId;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Upper bound of the progress percentage.
pub const PROGRESS_MAX: f64 = 100.0;

/// One poll of the progress estimator, tagged with the utterance it was
/// armed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick(pub UtteranceId);

/// Handle to a running periodic tick task.
///
/// Dropping the handle aborts the task. The controller keeps at most one, so
/// replacing it tears down the previous timer.
#[derive(Debug)]
pub struct ProgressTicker {
    handle: JoinHandle<()>,
}

impl ProgressTicker {
    /// Spawn a ticker for `utterance`.
    ///
    /// The first tick arrives one `period` after arming.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn arm(utterance: UtteranceId, period: Duration, tx: mpsc::UnboundedSender<Tick>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(Tick(utterance)).is_err() {
                    break;
                }
            }
        });

        tracing::trace!(%utterance, period_ms = period.as_millis(), "Progress ticker armed");
        Self { handle }
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Percentage points added per tick for a text of `text_chars` characters.
///
/// `factor` is the calibration constant `k` in `100 / (chars * k)`.
#[allow(clippy::cast_precision_loss)]
pub fn progress_step(text_chars: usize, factor: f64) -> f64 {
    if text_chars == 0 {
        return PROGRESS_MAX;
    }
    PROGRESS_MAX / (text_chars as f64 * factor)
}

/// Apply one step, clamped at [`PROGRESS_MAX`].
pub fn advance(progress: f64, step: f64) -> f64 {
    (progress + step).min(PROGRESS_MAX)
}
