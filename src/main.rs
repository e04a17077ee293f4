use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;
use taskcheck::commands::context::exit_code;
use taskcheck::logging::init_tracing;
use taskcheck::models::CheckStatus;

mod cli;

use cli::{dispatch, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match dispatch(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red().bold());
            ExitCode::from(exit_code(CheckStatus::FailedToCheck))
        }
    }
}
