use anyhow::Result;
use std::process::ExitCode;
use taskcheck::commands::context::exit_code;
use taskcheck::commands::{check, extract, run};

use super::types::Commands;

pub fn dispatch(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Check {
            task_dir,
            project,
            tests,
            json,
        } => {
            let status = check::execute(&task_dir, &project.into(), tests, json)?;
            Ok(ExitCode::from(exit_code(status)))
        }
        Commands::Run {
            task_dir,
            main_class,
            project,
            json,
        } => {
            let status = run::execute(&task_dir, &project.into(), main_class.as_deref(), json)?;
            Ok(ExitCode::from(exit_code(status)))
        }
        Commands::Extract { file, json } => {
            extract::execute(file.as_deref(), json)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
