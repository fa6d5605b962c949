//! Configuration command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use fundflow_core::config::default_path;
use fundflow_core::{FundflowConfig, HttpBackend};
use std::path::Path;

#[derive(Args)]
pub struct ConfigArgs {
    /// Also check that the backend is reachable
    #[arg(long)]
    pub check: bool,
}

pub async fn execute(args: ConfigArgs, config: &FundflowConfig, explicit: Option<&Path>) -> Result<()> {
    let source = match explicit {
        Some(path) => path.display().to_string(),
        None => match default_path().filter(|p| p.exists()) {
            Some(path) => path.display().to_string(),
            None => "built-in defaults".to_string(),
        },
    };

    println!("{} {}", "Source:".bold(), source.dimmed());
    println!();
    print!("{}", config.to_toml());

    if args.check {
        println!();
        let backend = HttpBackend::from_config(&config.backend)?;
        if backend.health_check().await {
            println!("{} Backend reachable at {}", "✓".green().bold(), backend.endpoint().cyan());
        } else {
            println!("{} Backend not reachable at {}", "✗".red().bold(), backend.endpoint().cyan());
        }
    }

    Ok(())
}
