//! One-shot analysis command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use fundflow_core::{render, AnalysisController, Dispatch, FundflowConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::output;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// AMFI scheme code (defaults to the configured identifier)
    pub identifier: Option<String>,
}

pub async fn execute(args: AnalyzeArgs, config: &FundflowConfig) -> Result<()> {
    let controller = super::build_controller(config)?;
    if let Some(identifier) = args.identifier {
        controller.on_identifier_changed(identifier);
    }

    output::print_header(&render(&controller.state()));

    if run_with_progress(&controller).await.is_none() {
        println!("{}", "Analysis cancelled.".yellow());
        return Ok(());
    }

    let view = render(&controller.state());
    output::print_outcome(&view);

    if view.error.is_some() {
        anyhow::bail!("analysis of '{}' failed", view.input.value);
    }
    Ok(())
}

/// Trigger one analysis, showing the busy view and a spinner until it
/// resolves.
///
/// Returns `None` when interrupted with Ctrl+C; the in-flight request is
/// dropped and the controller is left idle.
pub async fn run_with_progress(controller: &AnalysisController) -> Option<Dispatch> {
    let mut updates = controller.subscribe();
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );

    let run = controller.on_analyze_requested();
    tokio::pin!(run);

    let outcome = loop {
        tokio::select! {
            dispatch = &mut run => break Some(dispatch),
            changed = updates.changed() => {
                if changed.is_err() {
                    continue;
                }
                let view = render(&updates.borrow_and_update());
                if let Some(busy) = &view.busy {
                    spinner.suspend(|| output::print_busy(busy));
                    spinner.set_message(view.action.label);
                    spinner.enable_steady_tick(Duration::from_millis(120));
                }
            }
            _ = tokio::signal::ctrl_c() => break None,
        }
    };

    spinner.finish_and_clear();
    outcome
}
