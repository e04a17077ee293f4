//! Main class discovery for the `run` operation.
//!
//! Task files are tried in order; the first one declaring an entry point
//! decides the class passed to Gradle as `-PmainClass`.

use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

use crate::models::Task;

/// Finds the JVM class holding the entry point of one source file
pub trait MainClassLocator: Send + Sync {
    /// Fully qualified main class declared by `file`, if any
    fn main_class_for_file(&self, file: &Path) -> Option<String>;
}

/// Recognizes top-level `fun main` in Kotlin and `static void main` in Java
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceMainClassLocator;

impl MainClassLocator for SourceMainClassLocator {
    fn main_class_for_file(&self, file: &Path) -> Option<String> {
        let extension = file.extension()?.to_str()?;
        let stem = file.file_stem()?.to_str()?;

        let class_name = match extension {
            "kt" => kotlin_facade_name(stem),
            "java" => stem.to_string(),
            _ => return None,
        };

        let source = fs::read_to_string(file).ok()?;
        let entry_point = match extension {
            "kt" => kotlin_main(),
            _ => java_main(),
        };
        if !entry_point.is_match(&source) {
            return None;
        }

        match package_name(&source) {
            Some(package) => Some(format!("{package}.{class_name}")),
            None => Some(class_name),
        }
    }
}

/// Main class of `task`, taken from the first task file that declares one
pub fn find_main_class(task: &Task, locator: &dyn MainClassLocator) -> Option<String> {
    let found = task
        .files
        .values()
        .find_map(|file| locator.main_class_for_file(&task.dir.join(&file.name)));
    debug!(task = %task.name, main_class = ?found, "main class lookup");
    found
}

/// `main.kt` compiles to `MainKt`
fn kotlin_facade_name(stem: &str) -> String {
    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => format!("{}{}Kt", first.to_uppercase(), chars.as_str()),
        None => "Kt".to_string(),
    }
}

fn kotlin_main() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^fun\s+main\s*\(").expect("valid regex"))
}

fn java_main() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"public\s+static\s+void\s+main\s*\(\s*(final\s+)?String").expect("valid regex")
    })
}

fn package_name(source: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*package\s+([A-Za-z_][\w.]*)\s*;?\s*$").expect("valid regex")
    });
    re.captures(source).map(|c| c[1].to_string())
}
