//! Solution verification pipeline

pub mod cancel;
pub mod classify;
pub mod command;
pub mod launcher;
pub mod main_class;
pub mod messages;
pub mod parser;
pub mod pipeline;
pub mod runner_settings;
pub mod service;
pub mod synthesize;
pub mod target;

pub use cancel::CancelToken;
pub use classify::{post_process_output, Classification, OutputClassifier};
pub use command::{build_invocation, InvocationSpec};
pub use launcher::{launch, LaunchOptions, RawOutput};
pub use main_class::{find_main_class, MainClassLocator, SourceMainClassLocator};
pub use messages::{collect_messages, collect_messages_with_prefix, StructuredMessage};
pub use parser::{StudyTestParser, TestOutcome, TestOutputParser};
pub use pipeline::Checker;
pub use runner_settings::{with_test_runner, RunnerSettings, TestRunner, TestRunnerGuard};
pub use service::{CheckHandle, CheckService};
pub use synthesize::synthesize;
pub use target::{
    has_separate_unit, resolve_target, sanitize_name, unit_project_name, BuildFileLocator,
    BuildUnitLocator,
};
