//! CLI command definitions and handlers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fundflow_core::{AnalysisController, FundflowConfig, HttpBackend};
use std::path::PathBuf;
use std::sync::Arc;

pub mod analyze;
pub mod config;
pub mod interactive;
pub mod serve;

/// FundFlow - Multi-Agent Mutual Fund Advisor client
#[derive(Parser)]
#[command(name = "fundflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a configuration file (defaults to the per-user config)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Analysis endpoint, overrides the configuration file
    #[arg(long, global = true, env = "FUNDFLOW_ENDPOINT")]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze one fund and print the recommendation
    Analyze(analyze::AnalyzeArgs),

    /// Prompt for scheme codes and analyze them one after another
    Interactive,

    /// Serve the single-page web client
    Serve(serve::ServeArgs),

    /// Show the effective configuration
    Config(config::ConfigArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = self.load_config()?;

        match self.command {
            Commands::Analyze(args) => analyze::execute(args, &config).await,
            Commands::Interactive => interactive::execute(&config).await,
            Commands::Serve(args) => serve::execute(args, &config).await,
            Commands::Config(args) => config::execute(args, &config, self.config.as_deref()).await,
        }
    }

    fn load_config(&self) -> Result<FundflowConfig> {
        let config = FundflowConfig::load(self.config.as_deref()).context("Failed to load configuration")?;
        match &self.endpoint {
            Some(endpoint) => config
                .with_endpoint(endpoint.clone())
                .context("Invalid --endpoint"),
            None => Ok(config),
        }
    }
}

/// Build a controller wired to the configured HTTP backend.
pub fn build_controller(config: &FundflowConfig) -> Result<Arc<AnalysisController>> {
    let backend = HttpBackend::from_config(&config.backend).context("Failed to create HTTP client")?;
    Ok(Arc::new(AnalysisController::with_identifier(
        Arc::new(backend),
        config.client.default_identifier.clone(),
    )))
}
