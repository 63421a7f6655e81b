//! Error types for the logtally crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Everything that can stop a run before it starts, or break its output.
///
/// Reaching a configured limit is not an error; see
/// [`Termination`](crate::engine::Termination).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyzerError {
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegex { pattern: String, reason: String },
    #[error("Invalid field selector: {0}")]
    InvalidFieldSpec(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Config file error: {0}")]
    ConfigFile(String),
    #[error("IO error: {0}")]
    Io(String),
}

impl AnalyzerError {
    pub(crate) fn invalid_regex(pattern: &str, err: &regex::Error) -> Self {
        AnalyzerError::InvalidRegex {
            pattern: pattern.to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AnalyzerError {
    fn from(err: std::io::Error) -> Self {
        AnalyzerError::Io(err.to_string())
    }
}

impl From<serde_yaml::Error> for AnalyzerError {
    fn from(err: serde_yaml::Error) -> Self {
        AnalyzerError::ConfigFile(err.to_string())
    }
}
