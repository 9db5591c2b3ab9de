//! Error types for the bookkeeping assistant

use thiserror::Error;

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, AssistantError>;

#[derive(Error, Debug)]
pub enum AssistantError {

    // =============================
    // Oracle Errors
    // =============================

    /// A single attempt failed or answered with the error sentinel.
    #[error("Oracle call failed: {0}")]
    OracleCall(String),

    /// Every attempt allowed by the retry bound failed.
    /// `last_error` is kept for logs only and is not part of the message.
    #[error("Oracle unavailable: all {attempts} attempt(s) failed")]
    OracleExhausted { attempts: usize, last_error: String },

    // =============================
    // Pipeline Errors
    // =============================

    #[error("Malformed model output: {0}")]
    MalformedOutput(String),

    #[error("Unsupported report type: {0}")]
    UnsupportedReport(String),

    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AssistantError {
    /// True for failures that rotate to the next credential.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::OracleCall(_) | Self::HttpError(_))
    }
}
