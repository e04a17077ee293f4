//! Project setup shared by the `check` and `run` commands

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::config::CheckerConfig;
use crate::models::{CheckStatus, Project, Task};
use crate::verify::{CancelToken, Checker};

/// Files marking the root of a multi-project Gradle build
const SETTINGS_FILES: &[&str] = &["settings.gradle", "settings.gradle.kts"];

/// Project-level flags, all optional
#[derive(Debug, Clone, Default)]
pub struct ProjectOptions {
    /// Course root; found via the nearest Gradle settings file when absent
    pub course: Option<PathBuf>,
    /// Directory the build runs in; defaults to the course root
    pub project: Option<PathBuf>,
    pub java_home: Option<PathBuf>,
    /// Explicit config file instead of `taskcheck.toml` in the project dir
    pub config: Option<PathBuf>,
}

/// A checker ready to run against one loaded task
pub struct Prepared {
    pub checker: Checker,
    pub task: Task,
}

/// Resolve directories, configuration and task metadata
pub fn prepare(task_dir: &Path, options: &ProjectOptions) -> Result<Prepared> {
    let task_dir = canonical(task_dir)?;
    let course_dir = match &options.course {
        Some(course) => canonical(course)?,
        None => find_course_root(&task_dir)?,
    };
    let base_dir = match &options.project {
        Some(project) => canonical(project)?,
        None => course_dir.clone(),
    };

    let config = match &options.config {
        Some(path) => CheckerConfig::load_file(path)?,
        None => CheckerConfig::load(&base_dir)?,
    };

    let toolchain_home = options
        .java_home
        .clone()
        .or_else(|| config.resolve_toolchain_home());

    let task = Task::load(&course_dir, &task_dir)?;
    let mut project = Project::new(course_dir, toolchain_home);
    project.base_dir = Some(base_dir);

    Ok(Prepared {
        checker: Checker::new(project, config),
        task,
    })
}

/// Cancel `token` on Ctrl+C
pub fn cancel_on_interrupt(token: CancelToken) -> Result<()> {
    ctrlc::set_handler(move || {
        eprintln!("Interrupted, stopping the build...");
        token.cancel();
    })
    .context("Failed to set Ctrl+C handler")
}

/// Process exit code for a check status
pub fn exit_code(status: CheckStatus) -> u8 {
    match status {
        CheckStatus::Solved => 0,
        CheckStatus::Failed => 1,
        CheckStatus::FailedToCheck => 2,
    }
}

fn canonical(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .with_context(|| format!("Directory not found: {}", path.display()))
}

/// Nearest ancestor of the task holding a Gradle settings file
fn find_course_root(task_dir: &Path) -> Result<PathBuf> {
    let Some(root) = task_dir.ancestors().skip(1).find(|dir| {
        SETTINGS_FILES
            .iter()
            .any(|name| dir.join(name).is_file())
    }) else {
        bail!(
            "No settings.gradle found above {}. Pass --course explicitly.",
            task_dir.display()
        );
    };
    Ok(root.to_path_buf())
}
