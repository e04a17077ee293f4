//! Process-wide test runner selection.
//!
//! Hosts embedding the checker keep one test runner choice per linked build
//! root. A check needs Gradle itself to run the tests, so it overrides the
//! choice for its duration and puts the previous value back afterwards, also
//! when the check is cancelled or panics.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestRunner {
    /// Tests run through the build tool
    Gradle,
    /// Tests run by the host's own runner
    Platform,
}

#[derive(Debug, Default)]
pub struct RunnerSettings {
    state: Mutex<SettingsState>,
}

#[derive(Debug, Default)]
struct SettingsState {
    selections: HashMap<PathBuf, TestRunner>,
    overrides: HashMap<PathBuf, ActiveOverride>,
}

/// Overrides in force for one build root. The selection from before the
/// first of them is put back when the last one ends, in whatever order the
/// guards are dropped.
#[derive(Debug)]
struct ActiveOverride {
    saved: Option<TestRunner>,
    count: usize,
}

impl RunnerSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings shared by the whole process
    pub fn global() -> &'static RunnerSettings {
        static GLOBAL: OnceLock<RunnerSettings> = OnceLock::new();
        GLOBAL.get_or_init(RunnerSettings::new)
    }

    pub fn get(&self, build_root: &Path) -> Option<TestRunner> {
        self.lock().selections.get(build_root).copied()
    }

    /// Replace the selection for `build_root`, returning the previous one.
    /// `None` removes the entry.
    pub fn set(&self, build_root: &Path, runner: Option<TestRunner>) -> Option<TestRunner> {
        self.lock().replace(build_root, runner)
    }

    /// Select `runner` until the returned guard is dropped
    pub fn override_runner(&self, build_root: &Path, runner: TestRunner) -> TestRunnerGuard<'_> {
        let mut state = self.lock();
        let previous = state.replace(build_root, Some(runner));
        state
            .overrides
            .entry(build_root.to_path_buf())
            .or_insert(ActiveOverride {
                saved: previous,
                count: 0,
            })
            .count += 1;

        TestRunnerGuard {
            settings: self,
            build_root: build_root.to_path_buf(),
        }
    }

    fn release(&self, build_root: &Path) {
        let mut state = self.lock();
        let Some(active) = state.overrides.get_mut(build_root) else {
            return;
        };
        active.count -= 1;
        if active.count == 0 {
            let saved = active.saved;
            state.overrides.remove(build_root);
            state.replace(build_root, saved);
        }
    }

    // A panic while holding the lock cannot leave the maps half-updated.
    fn lock(&self) -> MutexGuard<'_, SettingsState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SettingsState {
    fn replace(&mut self, build_root: &Path, runner: Option<TestRunner>) -> Option<TestRunner> {
        match runner {
            Some(runner) => self.selections.insert(build_root.to_path_buf(), runner),
            None => self.selections.remove(build_root),
        }
    }
}

/// Ends one override on drop; the last one for a root restores the old selection
pub struct TestRunnerGuard<'a> {
    settings: &'a RunnerSettings,
    build_root: PathBuf,
}

impl Drop for TestRunnerGuard<'_> {
    fn drop(&mut self) {
        self.settings.release(&self.build_root);
    }
}

/// Run `action` with `runner` selected for `build_root`
pub fn with_test_runner<T>(
    settings: &RunnerSettings,
    build_root: &Path,
    runner: TestRunner,
    action: impl FnOnce() -> T,
) -> T {
    let _guard = settings.override_runner(build_root, runner);
    action()
}
