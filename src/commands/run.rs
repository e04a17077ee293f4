//! `taskcheck run` - run a task's program and show what it printed

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use super::check::print_result;
use super::context::{cancel_on_interrupt, prepare, ProjectOptions};
use crate::models::CheckStatus;
use crate::verify::CancelToken;

pub fn execute(
    task_dir: &Path,
    options: &ProjectOptions,
    main_class: Option<&str>,
    json: bool,
) -> Result<CheckStatus> {
    let prepared = prepare(task_dir, options)?;
    let cancel = CancelToken::new();
    cancel_on_interrupt(cancel.clone())?;

    if !json {
        println!(
            "{} Running '{}'...",
            "→".cyan().bold(),
            prepared.task.name.bold()
        );
    }

    match prepared
        .checker
        .run_program(&prepared.task, main_class, &cancel)
    {
        Ok(output) => {
            if json {
                println!("{}", serde_json::json!({ "output": output }));
            } else {
                println!("{output}");
            }
            Ok(CheckStatus::Solved)
        }
        Err(result) => {
            print_result(&result, json)?;
            Ok(result.status())
        }
    }
}
