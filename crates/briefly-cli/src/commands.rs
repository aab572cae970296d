//! Available subcommands.

use clap::Subcommand;

/// Available commands for the read-aloud player.
#[derive(Subcommand)]
pub enum Commands {
    /// List the voices the speech engine offers
    Voices,

    /// Show saved read-aloud preferences
    Prefs,

    /// Read an article summary aloud with an interactive prompt
    Read {
        /// Path to an article JSON file (an object, or an array of articles)
        article: String,

        /// Speech rate to use (and remember), e.g. 1.25
        #[arg(short, long)]
        rate: Option<f32>,

        /// Voice id to use (and remember)
        #[arg(long)]
        voice: Option<String>,
    },
}
