//! Process utilities for build processes
//!
//! Builds are started in their own process group on Unix so that cancelling a
//! check also stops the JVM processes the wrapper script forks.

use std::process::Child;
use std::time::Duration;
use wait_timeout::ChildExt;

#[cfg(unix)]
use nix::{
    sys::signal::{killpg, Signal},
    unistd::Pid,
};

/// Put a command into a fresh process group led by the child
pub fn isolate_process_group(cmd: &mut std::process::Command) {
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }
    #[cfg(not(unix))]
    let _ = cmd;
}

/// Terminate a child and everything in its process group, then reap it.
///
/// On Unix the group gets SIGTERM first and SIGKILL once `grace` has passed.
/// Elsewhere the child is killed directly.
pub fn terminate_child(child: &mut Child, grace: Duration) {
    #[cfg(unix)]
    {
        if let Ok(pgid) = i32::try_from(child.id()) {
            let pgid = Pid::from_raw(pgid);
            let _ = killpg(pgid, Signal::SIGTERM);
            if matches!(child.wait_timeout(grace), Ok(Some(_))) {
                // leader is gone, make sure stragglers in the group are too
                let _ = killpg(pgid, Signal::SIGKILL);
                return;
            }
            let _ = killpg(pgid, Signal::SIGKILL);
        }
    }
    #[cfg(not(unix))]
    let _ = grace;

    // Attempt to kill - ignore errors since the process may have already exited
    let _ = child.kill();
    let _ = child.wait();
}
