//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the Briefly read-aloud player.
#[derive(Parser)]
#[command(name = "briefly")]
#[command(about = "Read Briefly article summaries aloud")]
#[command(version)]
pub struct Cli {
    /// Override the data directory (preferences, config)
    #[arg(long = "data-dir", global = true, env = "BRIEFLY_DATA_DIR")]
    pub data_dir: Option<String>,

    /// Playback config file (defaults to config.json in the data directory)
    #[arg(long = "config", global = true)]
    pub config: Option<String>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
