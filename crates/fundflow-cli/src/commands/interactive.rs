//! Interactive session: prompt, analyze, repeat.

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::Input;
use fundflow_core::{render, FundflowConfig};

use super::analyze::run_with_progress;
use crate::output;

const QUIT_WORDS: [&str; 3] = [":q", "quit", "exit"];

pub async fn execute(config: &FundflowConfig) -> Result<()> {
    let controller = super::build_controller(config)?;
    output::print_header(&render(&controller.state()));
    println!(
        "{}",
        format!("Backend: {}  (type {} to leave)", config.backend.endpoint, QUIT_WORDS[0]).dimmed()
    );
    println!();

    loop {
        let view = render(&controller.state());
        let identifier: String = Input::new()
            .with_prompt(view.input.placeholder)
            .default(view.input.value)
            .allow_empty(true)
            .interact_text()
            .context("Failed to read scheme code")?;

        if is_quit(&identifier) {
            break;
        }

        controller.on_identifier_changed(identifier);
        if run_with_progress(&controller).await.is_none() {
            println!("{}", "Analysis cancelled.".yellow());
            println!();
            continue;
        }

        output::print_outcome(&render(&controller.state()));
        println!();
    }

    Ok(())
}

fn is_quit(input: &str) -> bool {
    QUIT_WORDS.contains(&input.trim())
}
