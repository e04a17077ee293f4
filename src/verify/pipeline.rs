//! Check and run pipelines
//!
//! Task metadata → target resolution → invocation → launch →
//! classification → message extraction → result synthesis.

use std::sync::Arc;
use tracing::{debug, info};

use super::cancel::CancelToken;
use super::classify::{post_process_output, Classification, OutputClassifier};
use super::command::build_invocation;
use super::launcher::{launch, LaunchOptions, RawOutput};
use super::main_class::{find_main_class, MainClassLocator, SourceMainClassLocator};
use super::messages::collect_messages;
use super::parser::{StudyTestParser, TestOutputParser};
use super::runner_settings::{with_test_runner, RunnerSettings, TestRunner};
use super::synthesize::synthesize;
use super::target::{resolve_target, BuildFileLocator, BuildUnitLocator};
use crate::config::CheckerConfig;
use crate::error::CheckError;
use crate::models::constants::gradle::{
    MAIN_CLASS_PROPERTY_PREFIX, RUN_TASK, TESTS_ARG, TEST_TASK,
};
use crate::models::constants::headline::NO_OUTPUT;
use crate::models::{CheckResult, Project, Task};

/// Runs checks for tasks of one project
pub struct Checker {
    project: Project,
    config: CheckerConfig,
    parser: Arc<dyn TestOutputParser>,
    locator: Arc<dyn BuildUnitLocator + Send + Sync>,
    main_classes: Arc<dyn MainClassLocator>,
}

impl Checker {
    pub fn new(project: Project, config: CheckerConfig) -> Self {
        let locator = BuildFileLocator::new(&project.course_dir, config.build_files.clone());
        Self {
            project,
            config,
            parser: Arc::new(StudyTestParser),
            locator: Arc::new(locator),
            main_classes: Arc::new(SourceMainClassLocator),
        }
    }

    #[cfg(test)]
    fn with_locator(mut self, locator: Arc<dyn BuildUnitLocator + Send + Sync>) -> Self {
        self.locator = locator;
        self
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Run the task's tests and produce exactly one result.
    ///
    /// Gradle is selected as the test runner for the course build while the
    /// check runs; the previous selection is restored afterwards.
    pub fn check(
        &self,
        task: &Task,
        test_filter: Option<&str>,
        cancel: &CancelToken,
    ) -> CheckResult {
        with_test_runner(
            RunnerSettings::global(),
            &self.project.course_dir,
            TestRunner::Gradle,
            || self.check_tests(task, test_filter, cancel),
        )
    }

    fn check_tests(
        &self,
        task: &Task,
        test_filter: Option<&str>,
        cancel: &CancelToken,
    ) -> CheckResult {
        let extra_args: Vec<String> = match test_filter {
            Some(pattern) => vec![TESTS_ARG.to_string(), pattern.to_string()],
            None => Vec::new(),
        };

        let output = match self.execute(task, TEST_TASK, &extra_args, cancel) {
            Ok(output) => output,
            Err(result) => return result,
        };

        let messages = collect_messages(output.stdout_lines());
        debug!(task = %task.name, count = messages.len(), "collected structured messages");
        synthesize(&messages, self.parser.as_ref())
    }

    /// Run the task's program with `main_class`, or with the main class
    /// found in the task files when none is given.
    ///
    /// On success returns the first non-blank message printed by the program;
    /// otherwise a failed result describing why the program did not run.
    pub fn run_program(
        &self,
        task: &Task,
        main_class: Option<&str>,
        cancel: &CancelToken,
    ) -> Result<String, CheckResult> {
        let main_class = match main_class.filter(|c| !c.trim().is_empty()) {
            Some(class) => class.to_string(),
            None => find_main_class(task, self.main_classes.as_ref()).ok_or_else(|| {
                CheckResult::failed(
                    format!("No main class found for task '{}'", task.name),
                    String::new(),
                )
            })?,
        };

        let extra_args = vec![format!("{MAIN_CLASS_PROPERTY_PREFIX}{main_class}")];
        let output = self.execute(task, RUN_TASK, &extra_args, cancel)?;

        let messages: Vec<String> = collect_messages(output.stdout_lines())
            .into_iter()
            .map(|m| post_process_output(m.as_str()))
            .collect();
        Ok(first_message(&messages))
    }

    /// Resolve, launch and classify. `Err` carries the terminal result for
    /// every path that must not reach message extraction.
    fn execute(
        &self,
        task: &Task,
        command: &str,
        extra_args: &[String],
        cancel: &CancelToken,
    ) -> Result<RawOutput, CheckResult> {
        let target = resolve_target(
            task,
            &self.project.course_dir,
            self.locator.as_ref(),
            command,
        )
        .map_err(CheckResult::from)?;

        let spec = build_invocation(&self.project, &target, extra_args)
            .ok_or_else(|| CheckResult::from(self.missing_precondition()))?;

        info!(task = %task.name, gradle_target = %target, "checking task");

        let output = launch(&spec, cancel, &LaunchOptions::from(&self.config))
            .map_err(CheckResult::from)?;

        if output.cancelled {
            return Err(CheckError::Cancelled.into());
        }

        let classifier =
            OutputClassifier::new(spec.target(), self.config.compilation_markers.clone());
        match classifier.classify(&output) {
            Classification::Failed(result) => Err(result),
            Classification::Success => Ok(output),
        }
    }

    fn missing_precondition(&self) -> CheckError {
        if self.project.base_dir.is_none() {
            CheckError::MissingBaseDir
        } else {
            CheckError::MissingToolchain
        }
    }
}

fn first_message(messages: &[String]) -> String {
    messages
        .iter()
        .find(|m| !m.trim().is_empty())
        .cloned()
        .unwrap_or_else(|| NO_OUTPUT.to_string())
}
