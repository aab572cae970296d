//! Voices command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::presentation::{print_separator, voice_row, voices_for_display};

/// List the engine's voices, English first. `>` marks the voice that would be
/// used, `*` a platform default.
pub fn execute(ctx: &CliContext) -> Result<()> {
    let (mut controller, _events) = ctx.controller();
    controller.initialize();

    let voices = controller.available_voices();
    if voices.is_empty() {
        println!("The speech engine reports no voices; the engine default will be used.");
        return Ok(());
    }

    let selected = controller.voice().map(|v| v.id.as_str());
    println!("{} voice(s), {} English:\n", voices.len(), controller.english_voices().len());
    println!("  {:<24} {:<8} Name", "ID", "Lang");
    print_separator(50);
    for voice in voices_for_display(voices) {
        println!("{}", voice_row(voice, selected == Some(voice.id.as_str())));
    }
    Ok(())
}
