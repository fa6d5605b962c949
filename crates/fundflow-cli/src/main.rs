//! FundFlow CLI - Multi-Agent Mutual Fund Advisor client
//!
//! Submits a scheme code to the analysis backend and shows the
//! recommendation, in the terminal or as a local single-page web app.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::{Cli, Commands};

/// Initialize tracing with optional file logging.
///
/// Terminal commands log to stderr at `warn` so diagnostics never mix with
/// the narrative on stdout. The web server logs request traffic at `info`.
fn init_tracing(log_file: Option<&std::path::Path>, terminal_mode: bool, verbose: bool) -> Result<()> {
    let default_filter = if verbose {
        "fundflow=debug,fundflow_core=debug,fundflow_web=debug,tower_http=debug"
    } else if terminal_mode {
        "fundflow=warn,fundflow_core=warn"
    } else {
        "fundflow=info,fundflow_core=info,fundflow_web=debug,tower_http=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;

        // Log to both stdout and file when --log is used
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    } else if terminal_mode {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = match &cli.command {
        Commands::Serve(args) if args.log => Some(args.log_path()),
        _ => None,
    };

    let terminal_mode = !matches!(&cli.command, Commands::Serve(_));
    init_tracing(log_file.as_deref(), terminal_mode, cli.verbose)?;

    cli.execute().await
}
