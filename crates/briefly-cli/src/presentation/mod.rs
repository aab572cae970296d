//! Terminal output for voices, preferences and playback events.

mod progress;

pub use progress::PlaybackProgress;

use briefly_core::VoiceDescriptor;
use briefly_tts::PlaybackSnapshot;

/// Print a horizontal separator line.
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

/// Voices ordered for display: English first, then the rest, each group in
/// catalog order.
pub fn voices_for_display(voices: &[VoiceDescriptor]) -> Vec<&VoiceDescriptor> {
    let (english, other): (Vec<_>, Vec<_>) = voices.iter().partition(|v| v.is_english());
    english.into_iter().chain(other).collect()
}

/// One table row for a voice; `*` marks the platform default.
pub fn voice_row(voice: &VoiceDescriptor, selected: bool) -> String {
    let marker = match (selected, voice.is_default) {
        (true, _) => ">",
        (false, true) => "*",
        (false, false) => " ",
    };
    format!("{marker} {:<24} {:<8} {}", voice.id, voice.lang, voice.name)
}

/// One-line status summary.
pub fn status_line(snapshot: &PlaybackSnapshot) -> String {
    let article = snapshot
        .article
        .as_ref()
        .map_or_else(|| "-".to_string(), |a| a.title.clone());
    let voice = snapshot
        .voice
        .as_ref()
        .map_or("engine default", |v| v.name.as_str());
    format!(
        "{:<8} {:>3.0}% rate {}x, voice {}, article: {}",
        snapshot.status.to_string(),
        snapshot.progress_percent,
        snapshot.rate,
        voice,
        article
    )
}
