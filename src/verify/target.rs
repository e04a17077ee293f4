//! Module/target resolution
//!
//! Courses come in two layouts: one Gradle subproject per task, or a single
//! build for the whole course. The layout is detected by comparing the build
//! unit owning the task directory with the one owning the course root.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::CheckError;
use crate::models::Task;

/// Finds the build unit that owns a directory
pub trait BuildUnitLocator {
    /// Root directory of the unit owning `dir`, if any
    fn unit_for(&self, dir: &Path) -> Option<PathBuf>;
}

/// Locates units by the presence of build files, never looking above the course root
#[derive(Debug, Clone)]
pub struct BuildFileLocator {
    course_dir: PathBuf,
    build_files: Vec<String>,
}

impl BuildFileLocator {
    pub fn new(course_dir: impl Into<PathBuf>, build_files: Vec<String>) -> Self {
        Self {
            course_dir: course_dir.into(),
            build_files,
        }
    }
}

impl BuildUnitLocator for BuildFileLocator {
    fn unit_for(&self, dir: &Path) -> Option<PathBuf> {
        dir.ancestors()
            .take_while(|candidate| candidate.starts_with(&self.course_dir))
            .find(|candidate| {
                self.build_files
                    .iter()
                    .any(|name| candidate.join(name).is_file())
            })
            .map(Path::to_path_buf)
    }
}

/// Whether the task is built by its own unit rather than the course-wide one
pub fn has_separate_unit(
    task: &Task,
    course_dir: &Path,
    locator: &dyn BuildUnitLocator,
) -> Result<bool, CheckError> {
    let task_unit = locator
        .unit_for(&task.dir)
        .ok_or_else(|| CheckError::UnresolvedUnit {
            path: task.dir.clone(),
        })?;
    let course_unit = locator
        .unit_for(course_dir)
        .ok_or_else(|| CheckError::UnresolvedUnit {
            path: course_dir.to_path_buf(),
        })?;

    Ok(task_unit != course_unit)
}

/// Gradle project path of a per-task subproject, e.g. `:Basics-Strings-Concat`
pub fn unit_project_name(task: &Task) -> String {
    let mut parts = Vec::with_capacity(3);
    if let Some(section) = &task.lesson.section {
        parts.push(sanitize_name(section));
    }
    parts.push(sanitize_name(&task.lesson.name));
    parts.push(sanitize_name(&task.dir_name()));
    format!(":{}", parts.join("-"))
}

/// Fully qualified target: unit-qualified when isolated, bare otherwise
pub fn resolve_target(
    task: &Task,
    course_dir: &Path,
    locator: &dyn BuildUnitLocator,
    command: &str,
) -> Result<String, CheckError> {
    if has_separate_unit(task, course_dir, locator)? {
        Ok(format!("{}:{command}", unit_project_name(task)))
    } else {
        Ok(command.to_string())
    }
}

/// Replace characters Gradle does not accept in project names
pub fn sanitize_name(name: &str) -> String {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    let re = UNSAFE.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]").expect("valid regex"));
    re.replace_all(name, "_").into_owned()
}
