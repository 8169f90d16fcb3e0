use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Invalid regex: {0}")]
    Regex(#[from] regex::Error),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("{0}")]
    Custom(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Conditions that abort a report run part-way through.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Report for test class {test_name} could not be found at {}", path.display())]
    MissingReport {
        test_name: String,
        path: PathBuf,
        remediation: String,
    },

    #[error("Coverage row for {class_name} in {} has no coverage legend", path.display())]
    MalformedRow { class_name: String, path: PathBuf },

    #[error("Failed to read source file {}: {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ReportError {
    /// Command the user can run to fix the problem, if there is one
    pub fn remediation(&self) -> Option<&str> {
        match self {
            ReportError::MissingReport { remediation, .. } => Some(remediation),
            _ => None,
        }
    }
}
