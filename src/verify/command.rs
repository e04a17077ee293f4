//! Invocation of the Gradle wrapper for one check attempt

use shell_escape::escape;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::models::constants::gradle::{TOOLCHAIN_HOME_VAR, WRAPPER_UNIX, WRAPPER_WINDOWS};
use crate::models::{HostOs, Project};

/// Everything needed to start the build process.
///
/// Built fresh for every attempt and never modified afterwards; there are no
/// setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationSpec {
    program: PathBuf,
    working_dir: PathBuf,
    env: BTreeMap<String, OsString>,
    args: Vec<String>,
    target: String,
}

impl InvocationSpec {
    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn env(&self) -> &BTreeMap<String, OsString> {
        &self.env
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Gradle target whose name must be echoed by a successful build
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Shell-escaped command line, for logs only
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.to_string_lossy())
            .chain(self.args.iter().map(|a| Cow::Borrowed(a.as_str())))
            .map(escape)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Program path as the OS should see it.
    ///
    /// `./gradlew` is relative to the working directory, not to our own cwd.
    fn resolved_program(&self) -> PathBuf {
        if self.program.is_relative() && self.program.components().count() > 1 {
            self.working_dir.join(&self.program)
        } else {
            self.program.clone()
        }
    }

    /// Build a `std::process::Command` with piped output and no stdin
    pub(crate) fn to_command(&self) -> Command {
        let mut cmd = Command::new(self.resolved_program());
        cmd.args(&self.args)
            .current_dir(&self.working_dir)
            .envs(self.env.iter().map(|(k, v)| (OsStr::new(k), v.as_os_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

/// Assemble the wrapper invocation for `target`.
///
/// Returns `None` when the project has no base directory or no toolchain
/// configured; nothing can be launched in that case.
pub fn build_invocation(
    project: &Project,
    target: &str,
    extra_args: &[String],
) -> Option<InvocationSpec> {
    let base_dir = project.base_dir.as_ref()?;
    let toolchain_home = project.toolchain_home.as_ref()?;

    let program = match project.host_os {
        HostOs::Windows => base_dir.join(WRAPPER_WINDOWS),
        HostOs::Unix => Path::new(".").join(WRAPPER_UNIX),
    };

    let mut env = BTreeMap::new();
    env.insert(
        TOOLCHAIN_HOME_VAR.to_string(),
        toolchain_home.as_os_str().to_os_string(),
    );

    let mut args = Vec::with_capacity(extra_args.len() + 1);
    args.push(target.to_string());
    args.extend(extra_args.iter().cloned());

    Some(InvocationSpec {
        program,
        working_dir: base_dir.clone(),
        env,
        args,
        target: target.to_string(),
    })
}
