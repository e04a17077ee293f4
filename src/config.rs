//! Checker configuration
//!
//! Read from `taskcheck.toml` in the project base directory (or an explicit
//! path). Every field is optional; a missing file yields the defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::constants::gradle::TOOLCHAIN_HOME_VAR;

pub const CONFIG_FILE: &str = "taskcheck.toml";

/// How often a blocked wait checks the cancellation token
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Time between SIGTERM and SIGKILL when cancelling a build
pub const DEFAULT_TERMINATION_GRACE: Duration = Duration::from_millis(500);

fn default_build_files() -> Vec<String> {
    vec!["build.gradle".to_string(), "build.gradle.kts".to_string()]
}

fn default_compilation_markers() -> Vec<String> {
    vec![
        "Compilation failed".to_string(),
        "Compilation error".to_string(),
    ]
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

fn default_termination_grace_ms() -> u64 {
    DEFAULT_TERMINATION_GRACE.as_millis() as u64
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// JDK home passed to the build; falls back to `JAVA_HOME`
    #[serde(default)]
    pub toolchain_home: Option<PathBuf>,

    /// File names that mark a directory as a build unit
    #[serde(default = "default_build_files")]
    pub build_files: Vec<String>,

    /// Substrings in build output that indicate a compilation failure
    #[serde(default = "default_compilation_markers")]
    pub compilation_markers: Vec<String>,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_termination_grace_ms")]
    pub termination_grace_ms: u64,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            toolchain_home: None,
            build_files: default_build_files(),
            compilation_markers: default_compilation_markers(),
            poll_interval_ms: default_poll_interval_ms(),
            termination_grace_ms: default_termination_grace_ms(),
        }
    }
}

impl CheckerConfig {
    /// Load `taskcheck.toml` from a project directory, or defaults if absent
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load_file(&config_path)
    }

    /// Load configuration from an explicit file
    pub fn load_file(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
    }

    /// Configured toolchain home, falling back to the `JAVA_HOME` environment variable
    pub fn resolve_toolchain_home(&self) -> Option<PathBuf> {
        self.toolchain_home.clone().or_else(|| {
            std::env::var_os(TOOLCHAIN_HOME_VAR)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn termination_grace(&self) -> Duration {
        Duration::from_millis(self.termination_grace_ms)
    }
}
