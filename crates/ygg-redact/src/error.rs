//! Error types for the redaction engine.
//!
//! Only policy construction can fail. Redaction itself has no error path:
//! adapters fall back to their input instead (see [`crate::Outcome`]).

use thiserror::Error;

/// Result type for redaction operations.
pub type Result<T> = std::result::Result<T, RedactionError>;

/// Errors that can occur while loading or validating a redaction policy.
#[derive(Error, Debug)]
pub enum RedactionError {
    /// The policy parsed but is not usable.
    #[error("policy error: {0}")]
    PolicyError(String),

    /// I/O error during policy file operations.
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl RedactionError {
    pub(crate) fn policy(message: impl Into<String>) -> Self {
        RedactionError::PolicyError(message.into())
    }
}
