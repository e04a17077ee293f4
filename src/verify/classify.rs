//! Ordered heuristics over raw build output.
//!
//! Toolchains report failure in different ways (stderr only, compiler
//! diagnostics, a build that never reached the target). The rules run top
//! down and the first match decides; output that passes every rule is handed
//! to message extraction.

use tracing::warn;

use super::launcher::RawOutput;
use crate::models::constants::headline::{COMPILATION_FAILED, FAILED_TO_CHECK};
use crate::models::CheckResult;

/// Result of classifying raw output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The build failed before producing trustworthy test output
    Failed(CheckResult),
    /// The target ran; structured messages may be extracted
    Success,
}

struct Rule {
    name: &'static str,
    matches: fn(&OutputClassifier, &RawOutput) -> bool,
    outcome: fn(&OutputClassifier, &RawOutput) -> CheckResult,
}

const RULES: &[Rule] = &[
    Rule {
        name: "stderr-only",
        matches: |_, output| !output.stderr.is_empty() && output.stdout.is_empty(),
        outcome: |_, output| {
            let stderr = post_process_output(&output.stderr);
            CheckResult::failed(stderr.clone(), stderr)
        },
    },
    Rule {
        name: "compilation-error",
        matches: |classifier, output| classifier.has_compilation_errors(output),
        outcome: |_, output| {
            CheckResult::failed(COMPILATION_FAILED, post_process_output(&output.stderr))
        },
    },
    Rule {
        name: "missing-target-echo",
        matches: |classifier, output| !output.stdout.contains(classifier.target.as_str()),
        outcome: |classifier, output| {
            warn!(
                gradle_target = %classifier.target,
                stdout = %output.stdout,
                "executing target failed"
            );
            let detail = [FAILED_TO_CHECK, output.stderr.as_str(), output.stdout.as_str()]
                .iter()
                .map(|part| post_process_output(part))
                .collect::<Vec<_>>()
                .join("\n");
            CheckResult::failed(FAILED_TO_CHECK, detail)
        },
    },
];

#[derive(Debug, Clone)]
pub struct OutputClassifier {
    target: String,
    compilation_markers: Vec<String>,
}

impl OutputClassifier {
    /// `target` is the name the build echoes when it reaches the requested task
    pub fn new(target: impl Into<String>, compilation_markers: Vec<String>) -> Self {
        Self {
            target: target.into(),
            compilation_markers,
        }
    }

    pub fn classify(&self, output: &RawOutput) -> Classification {
        match RULES.iter().find(|rule| (rule.matches)(self, output)) {
            Some(rule) => {
                tracing::debug!(rule = rule.name, "build output classified as failure");
                Classification::Failed((rule.outcome)(self, output))
            }
            None => Classification::Success,
        }
    }

    fn has_compilation_errors(&self, output: &RawOutput) -> bool {
        self.compilation_markers
            .iter()
            .filter(|marker| !marker.is_empty())
            .any(|marker| {
                output.stdout.contains(marker.as_str()) || output.stderr.contains(marker.as_str())
            })
    }
}

/// Normalize line endings and drop one trailing newline
pub fn post_process_output(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    match normalized.strip_suffix('\n') {
        Some(stripped) => stripped.to_string(),
        None => normalized,
    }
}
