use serde::{Deserialize, Serialize};

use super::constants::headline;
use crate::error::CheckError;

/// Outcome category of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Solved,
    Failed,
    FailedToCheck,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Solved => write!(f, "solved"),
            CheckStatus::Failed => write!(f, "failed"),
            CheckStatus::FailedToCheck => write!(f, "failed to check"),
        }
    }
}

/// Terminal result of a check. Fields are private so a produced result cannot
/// be altered by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    status: CheckStatus,
    headline: String,
    detail: String,
}

impl CheckResult {
    pub fn new(status: CheckStatus, headline: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            status,
            headline: headline.into(),
            detail: detail.into(),
        }
    }

    pub fn solved(headline: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(CheckStatus::Solved, headline, detail)
    }

    pub fn failed(headline: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(CheckStatus::Failed, headline, detail)
    }

    pub fn failed_to_check(headline: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(CheckStatus::FailedToCheck, headline, detail)
    }

    pub fn status(&self) -> CheckStatus {
        self.status
    }

    pub fn headline(&self) -> &str {
        &self.headline
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn is_solved(&self) -> bool {
        self.status == CheckStatus::Solved
    }
}

impl From<&CheckError> for CheckResult {
    fn from(err: &CheckError) -> Self {
        let headline = match err {
            CheckError::Parse { .. } => headline::PARSE_FAILED,
            CheckError::Cancelled => headline::CANCELLED,
            _ => headline::FAILED_TO_CHECK,
        };
        CheckResult::failed_to_check(headline, err.detail())
    }
}

impl From<CheckError> for CheckResult {
    fn from(err: CheckError) -> Self {
        CheckResult::from(&err)
    }
}
