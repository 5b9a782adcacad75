//! Error types for dashboard operations.
//!
//! This module defines [`FarmError`] which covers the failures that can occur
//! when talking to the survey data backend or decoding its responses.
//! Server-reported logical errors are not errors at this level: they arrive as
//! [`ApiOutcome::Error`](crate::types::ApiOutcome::Error).

use thiserror::Error;

/// Errors that can occur during dashboard operations.
#[derive(Error, Debug)]
pub enum FarmError {
    /// Network-related errors (connection failures, timeouts, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// The response body could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The requested feature is not supported.
    #[error("Feature not supported: {0}")]
    NotSupported(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for FarmError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

/// Result type alias using [`FarmError`].
pub type Result<T> = std::result::Result<T, FarmError>;
