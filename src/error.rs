//! Error types for explanation configuration.
//!
//! Explaining headers never fails: malformed header values degrade to
//! "absent". Errors only surface at the configuration boundary, when an
//! option label, a now override or an options document cannot be decoded.

use thiserror::Error;

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ExplainError>;

/// Main error type for configuration operations.
#[derive(Debug, Error)]
pub enum ExplainError {
    /// Audience label is neither `user` nor `developer`.
    #[error("Invalid audience: {0:?} (expected \"user\" or \"developer\")")]
    InvalidAudience(String),

    /// Style label is neither `short` nor `verbose`.
    #[error("Invalid style: {0:?} (expected \"short\" or \"verbose\")")]
    InvalidStyle(String),

    /// Number parsing label is neither `lenient` nor `strict`.
    #[error("Invalid number parsing mode: {0:?} (expected \"lenient\" or \"strict\")")]
    InvalidNumberParsing(String),

    /// Now override does not start with an integer.
    #[error("Invalid now override: {0:?}")]
    InvalidNow(String),

    /// Options document could not be decoded.
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl ExplainError {
    /// Check if this error came from an unrecognized option label.
    pub fn is_invalid_label(&self) -> bool {
        matches!(
            self,
            Self::InvalidAudience(_) | Self::InvalidStyle(_) | Self::InvalidNumberParsing(_)
        )
    }
}
