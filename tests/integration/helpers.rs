//! Shared fixtures: a temporary course with a scripted `gradlew`

use nix::errno::Errno;
use nix::sys::signal::kill;
use nix::unistd::Pid;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use taskcheck::config::CheckerConfig;
use taskcheck::models::{HostOs, Project, Task};
use taskcheck::verify::Checker;

pub const FAKE_JDK: &str = "/opt/fake-jdk";

/// A course on disk. The temp dir is removed when the fixture is dropped.
pub struct Course {
    _temp: TempDir,
    pub root: PathBuf,
}

impl Course {
    /// Course built by a single root build file
    pub fn shared() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp
            .path()
            .canonicalize()
            .expect("Failed to canonicalize temp directory");
        fs::write(root.join("settings.gradle"), "").expect("Failed to write settings.gradle");
        fs::write(root.join("build.gradle"), "").expect("Failed to write build.gradle");
        Self { _temp: temp, root }
    }

    /// Create `<root>/<rel>` as a task directory
    pub fn add_task(&self, rel: &str) -> PathBuf {
        let dir = self.root.join(rel);
        fs::create_dir_all(dir.join("src")).expect("Failed to create task directory");
        dir
    }

    /// Create a task with its own build file, making it an isolated unit
    pub fn add_isolated_task(&self, rel: &str) -> PathBuf {
        let dir = self.add_task(rel);
        fs::write(dir.join("build.gradle"), "").expect("Failed to write task build.gradle");
        dir
    }

    /// Install `body` as the wrapper script
    pub fn write_gradlew(&self, body: &str) {
        let path = self.root.join("gradlew");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write gradlew");
        let mut perms = fs::metadata(&path)
            .expect("Failed to stat gradlew")
            .permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("Failed to chmod gradlew");
    }

    /// Wrapper that records its arguments and JAVA_HOME, then prints `stdout`
    pub fn write_recording_gradlew(&self, stdout: &[&str]) {
        let mut body = String::from(
            "echo \"$@\" > args.txt\necho \"$JAVA_HOME\" > java_home.txt\n",
        );
        for line in stdout {
            body.push_str(&format!("printf '%s\\n' '{line}'\n"));
        }
        self.write_gradlew(&body);
    }

    pub fn read(&self, name: &str) -> Option<String> {
        fs::read_to_string(self.root.join(name))
            .ok()
            .map(|s| s.trim_end().to_string())
    }

    pub fn project(&self, toolchain_home: Option<&str>) -> Project {
        Project {
            base_dir: Some(self.root.clone()),
            course_dir: self.root.clone(),
            toolchain_home: toolchain_home.map(PathBuf::from),
            host_os: HostOs::Unix,
        }
    }

    pub fn checker(&self) -> Checker {
        Checker::new(self.project(Some(FAKE_JDK)), fast_config())
    }

    pub fn task(&self, dir: &Path) -> Task {
        Task::load(&self.root, dir).expect("Failed to load task")
    }
}

/// Config with short polling so cancellation tests finish quickly
pub fn fast_config() -> CheckerConfig {
    CheckerConfig {
        poll_interval_ms: 20,
        termination_grace_ms: 200,
        ..CheckerConfig::default()
    }
}

/// Whether `pid` still names a process (the null signal delivers nothing)
pub fn process_exists(pid: u32) -> bool {
    let Ok(pid) = i32::try_from(pid) else {
        return false;
    };
    match kill(Pid::from_raw(pid), None) {
        Ok(()) | Err(Errno::EPERM) => true,
        Err(_) => false,
    }
}
