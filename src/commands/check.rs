//! `taskcheck check` - run a task's tests and report the verdict

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use super::context::{cancel_on_interrupt, prepare, ProjectOptions};
use crate::models::{CheckResult, CheckStatus};
use crate::verify::CheckService;

/// Check one task, printing the result. Returns the status for the exit code.
pub fn execute(
    task_dir: &Path,
    options: &ProjectOptions,
    test_filter: Option<String>,
    json: bool,
) -> Result<CheckStatus> {
    let prepared = prepare(task_dir, options)?;

    if !json {
        println!(
            "{} Checking '{}'...",
            "→".cyan().bold(),
            prepared.task.name.bold()
        );
    }

    let service = CheckService::new(prepared.checker);
    let handle = service.spawn(prepared.task, test_filter);
    cancel_on_interrupt(handle.cancel_token())?;

    let result = handle.wait();
    print_result(&result, json)?;
    Ok(result.status())
}

/// Print a result, either as text or as a JSON object
pub fn print_result(result: &CheckResult, json: bool) -> Result<()> {
    if json {
        let rendered =
            serde_json::to_string_pretty(result).context("Failed to serialize check result")?;
        println!("{rendered}");
        return Ok(());
    }

    let marker = match result.status() {
        CheckStatus::Solved => "✓".green().bold(),
        CheckStatus::Failed => "✗".red().bold(),
        CheckStatus::FailedToCheck => "!".yellow().bold(),
    };
    println!("{marker} {}", result.headline().bold());

    let detail = result.detail();
    if !detail.is_empty() && detail != result.headline() {
        for line in detail.lines() {
            println!("  {}", line.dimmed());
        }
    }

    Ok(())
}
