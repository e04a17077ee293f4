//! Turns structured messages into the terminal check result

use tracing::warn;

use super::messages::StructuredMessage;
use super::parser::{TestOutcome, TestOutputParser};
use crate::models::constants::headline::NO_TEST_RESULTS;
use crate::models::constants::status_line::CONGRATULATIONS;
use crate::models::CheckResult;

const NO_TEST_RESULTS_DETAIL: &str =
    "The build finished, but the test adapter did not report any results";

/// Build the result for a run the classifier accepted.
///
/// Solved only when at least one test was reported and every reported test
/// passed. A message the parser rejects turns the whole check into
/// `FailedToCheck` with the raw message as detail.
pub fn synthesize(messages: &[StructuredMessage], parser: &dyn TestOutputParser) -> CheckResult {
    let mut outcomes: Vec<TestOutcome> = Vec::new();

    for message in messages {
        match parser.parse(message) {
            Ok(parsed) => outcomes.extend(parsed),
            Err(e) => {
                warn!(error = %e, "test output could not be parsed");
                return CheckResult::from(e);
            }
        }
    }

    if outcomes.is_empty() {
        return CheckResult::failed_to_check(NO_TEST_RESULTS, NO_TEST_RESULTS_DETAIL);
    }

    let detail = outcomes
        .iter()
        .map(TestOutcome::render)
        .collect::<Vec<_>>()
        .join("\n");

    match outcomes.iter().find(|o| !o.passed) {
        Some(first_failure) => CheckResult::failed(first_failure.summary.clone(), detail),
        None => CheckResult::solved(CONGRATULATIONS, detail),
    }
}
