//! Run command - turn one ticket into a pull request

use crate::cli::progress::CliProgress;
use crate::cli::style::{check, cross, hyperlink_url, Stream, Stylize};
use anstream::{eprintln, println};
use dialoguer::Input;
use std::io::IsTerminal;
use ticket2pr::config::AppConfig;
use ticket2pr::error::{Error, Result};
use ticket2pr::pipeline::TicketPipeline;
use ticket2pr::types::{PipelineResult, TicketRequest};

/// Run the pipeline for `url`, returning whether a pull request was opened
///
/// With `json` set, the result is printed as JSON on stdout and no progress
/// is drawn.
pub async fn run_ticket(url: &str, description: Option<String>, json: bool) -> Result<bool> {
    let config = AppConfig::from_env()?;
    let pipeline = TicketPipeline::from_config(&config).await?;

    let description = match description {
        Some(d) => d,
        None => prompt_description()?,
    };
    let request = TicketRequest::new(url, description);

    let result = if json {
        let result = pipeline.process(&request).await;
        let rendered = serde_json::to_string_pretty(&result)
            .map_err(|e| Error::Internal(format!("failed to serialize result: {e}")))?;
        println!("{rendered}");
        result
    } else {
        let progress = CliProgress::new();
        let result = pipeline.process_with_progress(&request, &progress).await;
        print_summary(&result);
        result
    };

    Ok(result.is_success())
}

fn prompt_description() -> Result<String> {
    if !std::io::stdin().is_terminal() {
        return Err(Error::Config(
            "no ticket description given; pass --description".to_string(),
        ));
    }

    Input::<String>::new()
        .with_prompt("Ticket description")
        .interact_text()
        .map_err(|e| Error::Internal(format!("failed to read description: {e}")))
}

fn print_summary(result: &PipelineResult) {
    if result.is_success() {
        println!();
        println!(
            "{} Opened pull request from {}",
            check(),
            result.branch_name.accent()
        );
        println!(
            "  {}",
            hyperlink_url(Stream::Stdout, &result.pull_request_url)
        );
    } else {
        eprintln!();
        eprintln!("{} {}", cross(), result.message.error());
    }
}
