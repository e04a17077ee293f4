//! Interpretation of structured messages.
//!
//! The synthesizer only knows "did every test pass" and "what to show"; the
//! test framework's own encoding is handled by a [`TestOutputParser`].

use crate::error::CheckError;
use crate::models::constants::status_line::{CONGRATULATIONS, TEST_FAILED, TEST_OK};

use super::messages::StructuredMessage;

/// Result of one test as reported by the adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    pub passed: bool,
    /// One-line summary (test name or failure message)
    pub summary: String,
    /// Further lines, e.g. an assertion diff or stack trace
    pub detail: Option<String>,
}

impl TestOutcome {
    pub fn passed(summary: impl Into<String>) -> Self {
        Self {
            passed: true,
            summary: summary.into(),
            detail: None,
        }
    }

    pub fn failed(summary: impl Into<String>) -> Self {
        Self {
            passed: false,
            summary: summary.into(),
            detail: None,
        }
    }

    /// Summary followed by the detail lines, if any
    pub fn render(&self) -> String {
        match &self.detail {
            Some(detail) => format!("{}\n{}", self.summary, detail),
            None => self.summary.clone(),
        }
    }
}

pub trait TestOutputParser: Send + Sync {
    /// Parse one message into the outcomes it reports, in order
    fn parse(&self, message: &StructuredMessage) -> Result<Vec<TestOutcome>, CheckError>;
}

/// Parser for the status lines written by the course test adapter:
///
/// ```text
/// test OK [name]
/// FAILED + <message>
/// <diff or stack trace lines...>
/// Congratulations!
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StudyTestParser;

impl TestOutputParser for StudyTestParser {
    fn parse(&self, message: &StructuredMessage) -> Result<Vec<TestOutcome>, CheckError> {
        let mut outcomes: Vec<TestOutcome> = Vec::new();
        let mut failure_lines: Vec<&str> = Vec::new();

        for line in message.as_str().lines() {
            let status = line.trim_start();

            let next = if is_word_prefixed(status, TEST_OK) {
                Some(TestOutcome::passed(status.trim_end()))
            } else if status.trim_end() == CONGRATULATIONS {
                Some(TestOutcome::passed(CONGRATULATIONS))
            } else if let Some(reason) = failure_reason(status) {
                Some(TestOutcome::failed(reason.trim()))
            } else {
                None
            };

            match next {
                Some(outcome) => {
                    attach_detail(&mut outcomes, &mut failure_lines);
                    outcomes.push(outcome);
                }
                None if outcomes.last().is_some_and(|o| !o.passed) => failure_lines.push(line),
                None if status.is_empty() => {}
                None => {
                    return Err(CheckError::Parse {
                        reason: format!("unexpected line `{}`", line.trim()),
                        raw: message.to_string(),
                    })
                }
            }
        }
        attach_detail(&mut outcomes, &mut failure_lines);

        if outcomes.is_empty() {
            return Err(CheckError::Parse {
                reason: "no status line".to_string(),
                raw: message.to_string(),
            });
        }

        Ok(outcomes)
    }
}

/// `line` is `prefix` alone or `prefix` followed by whitespace
fn is_word_prefixed(line: &str, prefix: &str) -> bool {
    line.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

/// Message of a `FAILED + <message>` line; a bare `FAILED +` has an empty one
fn failure_reason(line: &str) -> Option<&str> {
    line.strip_prefix(TEST_FAILED)
        .or_else(|| (line.trim_end() == TEST_FAILED.trim_end()).then_some(""))
}

fn attach_detail(outcomes: &mut [TestOutcome], lines: &mut Vec<&str>) {
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    if let Some(last) = outcomes.last_mut() {
        if !lines.is_empty() {
            last.detail = Some(lines.join("\n"));
        }
    }
    lines.clear();
}
