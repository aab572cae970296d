//! CLI entry point - the composition root.
//!
//! Parses arguments, installs logging, bootstraps the playback stack and
//! dispatches to a command handler.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use briefly_cli::handlers::read::ReadArgs;
use briefly_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging: RUST_LOG wins, otherwise info (debug with --verbose)
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match run(cli.data_dir.as_deref(), cli.config.as_deref(), command).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => match err.downcast_ref::<CliError>() {
            Some(cli_err) => {
                eprintln!("Error: {cli_err}");
                let code = u8::try_from(cli_err.exit_code()).unwrap_or(1);
                Ok(ExitCode::from(code))
            }
            None => Err(err),
        },
    }
}

/// Bootstrap the CLI context and dispatch `command`.
async fn run(
    data_dir: Option<&str>,
    config: Option<&str>,
    command: Commands,
) -> anyhow::Result<()> {
    // Bootstrap the CLI context (composition root)
    let config = CliConfig::with_overrides(data_dir, config)?;
    let ctx = bootstrap(config)?;

    match command {
        Commands::Voices => handlers::voices::execute(&ctx),
        Commands::Prefs => handlers::prefs::execute(&ctx),
        Commands::Read {
            article,
            rate,
            voice,
        } => handlers::read::execute(&ctx, ReadArgs { article, rate, voice }).await,
    }
}
