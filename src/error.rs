//! Error taxonomy for a single check attempt.
//!
//! Every variant ends up as a `FailedToCheck` result; tool-reported and
//! compilation failures are never errors, they are classified output.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("project base directory is not configured")]
    MissingBaseDir,

    #[error("toolchain home is not configured")]
    MissingToolchain,

    #[error("failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no build unit owns {}", path.display())]
    UnresolvedUnit { path: PathBuf },

    #[error("malformed test output: {reason}")]
    Parse { reason: String, raw: String },

    #[error("checking was cancelled")]
    Cancelled,

    #[error("check worker panicked: {0}")]
    WorkerPanicked(String),
}

impl CheckError {
    /// Text shown to the learner as the result detail
    pub fn detail(&self) -> String {
        match self {
            CheckError::Parse { raw, .. } => raw.clone(),
            other => other.to_string(),
        }
    }
}
