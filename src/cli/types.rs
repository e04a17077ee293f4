use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use taskcheck::commands::context::ProjectOptions;

#[derive(Parser)]
#[command(name = "taskcheck")]
#[command(about = "Verify exercise solutions with the course's Gradle build", long_about = None)]
#[command(version)]
#[command(subcommand_help_heading = "Commands")]
pub struct Cli {
    /// Log pipeline steps (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the tests of a task and report solved / failed
    ///
    /// Exit code: 0 solved, 1 failed, 2 could not be checked
    Check {
        /// Task directory (<course>/[<section>/]<lesson>/<task>)
        task_dir: PathBuf,

        #[command(flatten)]
        project: ProjectArgs,

        /// Only run tests matching this Gradle filter pattern
        #[arg(long = "tests", value_name = "PATTERN")]
        tests: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the program of a task and print its first message
    Run {
        /// Task directory (<course>/[<section>/]<lesson>/<task>)
        task_dir: PathBuf,

        /// Fully qualified main class (default: found in the task files)
        #[arg(long, value_name = "CLASS")]
        main_class: Option<String>,

        #[command(flatten)]
        project: ProjectArgs,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the structured messages found in captured build output
    Extract {
        /// File with captured stdout (reads stdin when omitted)
        file: Option<PathBuf>,

        /// Print the messages as a JSON array
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Course root (default: nearest directory with settings.gradle)
    #[arg(long, value_name = "DIR")]
    pub course: Option<PathBuf>,

    /// Directory the build runs in (default: course root)
    #[arg(long, value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// JDK home passed to Gradle (default: config, then JAVA_HOME)
    #[arg(long, value_name = "DIR")]
    pub java_home: Option<PathBuf>,

    /// Config file (default: taskcheck.toml in the project directory)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl From<ProjectArgs> for ProjectOptions {
    fn from(args: ProjectArgs) -> Self {
        ProjectOptions {
            course: args.course,
            project: args.project,
            java_home: args.java_home,
            config: args.config,
        }
    }
}
