//! Read-only view of an exercise in the course tree.
//!
//! Tasks live at `<course>/[<section>/]<lesson>/<task>/`. An optional
//! `task-info.yaml` in the task directory provides the display name and the
//! list of task files; without it the directory name is used.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

pub const TASK_INFO_FILE: &str = "task-info.yaml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    pub name: String,
    pub section: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFile {
    pub name: String,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub name: String,
    pub dir: PathBuf,
    pub lesson: Lesson,
    pub files: BTreeMap<String, TaskFile>,
}

#[derive(Debug, Default, Deserialize)]
struct TaskInfo {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    files: Vec<TaskFileInfo>,
}

#[derive(Debug, Deserialize)]
struct TaskFileInfo {
    name: String,
    #[serde(default = "default_visible")]
    visible: bool,
}

fn default_visible() -> bool {
    true
}

impl Task {
    /// Load a task from its directory inside `course_dir`
    pub fn load(course_dir: &Path, task_dir: &Path) -> Result<Self> {
        let relative = task_dir.strip_prefix(course_dir).with_context(|| {
            format!(
                "Task directory {} is not inside course {}",
                task_dir.display(),
                course_dir.display()
            )
        })?;

        let parts: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        let (section, lesson, dir_name) = match parts.as_slice() {
            [lesson, task] => (None, lesson.clone(), task.clone()),
            [section, lesson, task] => (Some(section.clone()), lesson.clone(), task.clone()),
            _ => bail!(
                "Expected <lesson>/<task> or <section>/<lesson>/<task> under the course, got {}",
                relative.display()
            ),
        };

        let info = load_task_info(task_dir)?;
        let files = info
            .files
            .into_iter()
            .map(|f| {
                (
                    f.name.clone(),
                    TaskFile {
                        name: f.name,
                        visible: f.visible,
                    },
                )
            })
            .collect();

        Ok(Self {
            name: info.name.unwrap_or_else(|| dir_name.clone()),
            dir: task_dir.to_path_buf(),
            lesson: Lesson {
                name: lesson,
                section,
            },
            files,
        })
    }

    /// Name of the task directory on disk
    pub fn dir_name(&self) -> String {
        self.dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }
}

fn load_task_info(task_dir: &Path) -> Result<TaskInfo> {
    let info_path = task_dir.join(TASK_INFO_FILE);
    if !info_path.exists() {
        return Ok(TaskInfo::default());
    }

    let content = fs::read_to_string(&info_path)
        .with_context(|| format!("Failed to read {}", info_path.display()))?;
    if content.trim().is_empty() {
        return Ok(TaskInfo::default());
    }

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", info_path.display()))
}
