//! Web server command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use fundflow_core::FundflowConfig;
use std::path::PathBuf;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, default_value = "3030")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file path used with --log
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl ServeArgs {
    /// Log file to use with `--log`.
    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("fundflow")
                .join("serve.log")
        })
    }
}

pub async fn execute(args: ServeArgs, config: &FundflowConfig) -> Result<()> {
    let controller = super::build_controller(config)?;

    println!();
    println!("  {} {}", "FundFlow".cyan().bold(), "Web Client".bold());
    println!();
    println!("  {}     http://{}:{}", "Page".green(), args.host, args.port);
    println!("  {}    http://{}:{}/api/state", "State".green(), args.host, args.port);
    println!("  {}  {}", "Backend".green(), config.backend.endpoint);
    if args.log {
        println!("  {}     {}", "Logs".green(), args.log_path().display());
    }
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    fundflow_web::run_server(controller, &args.host, args.port).await?;

    Ok(())
}
