//! Prefs command handler.

use anyhow::Result;
use briefly_core::{Preferences, RATE_PRESETS};

use crate::bootstrap::CliContext;

/// Show the saved rate and voice.
pub fn execute(ctx: &CliContext) -> Result<()> {
    let prefs = Preferences::load(ctx.store.as_ref());

    println!("Preferences file: {}", ctx.store.path().display());
    match prefs.rate {
        Some(rate) => println!("Speech rate:      {rate}x"),
        None => println!("Speech rate:      (not set, {}x)", ctx.playback.default_rate),
    }
    println!(
        "Voice:            {}",
        prefs.voice_id.as_deref().unwrap_or("(not set)")
    );

    let presets: Vec<String> = RATE_PRESETS.iter().map(|r| format!("{r}x")).collect();
    println!("Rate presets:     {}", presets.join(", "));
    Ok(())
}
