//! Background check execution
//!
//! Every check gets its own worker thread. Checks of the same task directory
//! queue behind each other; checks of different tasks run independently.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tracing::{debug, error};

use super::cancel::CancelToken;
use super::pipeline::Checker;
use crate::error::CheckError;
use crate::models::{CheckResult, Task};

type TaskLocks = Arc<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>>;

pub struct CheckService {
    checker: Arc<Checker>,
    task_locks: TaskLocks,
}

impl CheckService {
    pub fn new(checker: Checker) -> Self {
        Self {
            checker: Arc::new(checker),
            task_locks: Arc::default(),
        }
    }

    /// Start checking `task` on a worker thread
    pub fn spawn(&self, task: Task, test_filter: Option<String>) -> CheckHandle {
        let cancel = CancelToken::new();
        let worker_cancel = cancel.clone();
        let checker = Arc::clone(&self.checker);
        let task_locks = Arc::clone(&self.task_locks);
        let task_lock = lock_for(&task_locks, &task);

        let spawned = thread::Builder::new()
            .name(format!("check-{}", task.dir_name()))
            .spawn(move || {
                let result = {
                    let _serial = task_lock
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner());

                    // cancelled while queued behind another check of this task
                    if worker_cancel.is_cancelled() {
                        CheckResult::from(CheckError::Cancelled)
                    } else {
                        debug!(task = %task.name, "check worker started");
                        checker.check(&task, test_filter.as_deref(), &worker_cancel)
                    }
                };
                release_lock(&task_locks, &task, task_lock);
                result
            });

        let state = match spawned {
            Ok(handle) => HandleState::Running(handle),
            Err(e) => {
                error!(error = %e, "failed to start check worker");
                HandleState::Finished(CheckResult::from(CheckError::WorkerPanicked(
                    e.to_string(),
                )))
            }
        };

        CheckHandle { cancel, state }
    }
}

fn lock_for(locks: &TaskLocks, task: &Task) -> Arc<Mutex<()>> {
    let mut locks = locks
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    Arc::clone(locks.entry(task.dir.clone()).or_default())
}

/// Drop the map entry once no check of the task holds or waits for it
fn release_lock(locks: &TaskLocks, task: &Task, lock: Arc<Mutex<()>>) {
    let mut locks = locks
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    drop(lock);
    if locks
        .get(&task.dir)
        .is_some_and(|entry| Arc::strong_count(entry) == 1)
    {
        locks.remove(&task.dir);
    }
}

enum HandleState {
    Running(JoinHandle<CheckResult>),
    Finished(CheckResult),
}

/// Caller side of a running check
pub struct CheckHandle {
    cancel: CancelToken,
    state: HandleState,
}

impl CheckHandle {
    /// Ask the check to stop; the build process is terminated
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token that cancels this check, e.g. for a signal handler
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        match &self.state {
            HandleState::Running(handle) => handle.is_finished(),
            HandleState::Finished(_) => true,
        }
    }

    /// Block until the check produces its result
    pub fn wait(self) -> CheckResult {
        match self.state {
            HandleState::Finished(result) => result,
            HandleState::Running(handle) => match handle.join() {
                Ok(result) => result,
                Err(payload) => {
                    let message = payload
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| payload.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    error!(panic = %message, "check worker panicked");
                    CheckResult::from(CheckError::WorkerPanicked(message))
                }
            },
        }
    }
}
