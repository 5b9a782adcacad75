//! CLI error type.

use farmview_core::FarmError;
use thiserror::Error;

/// Errors that end a CLI run with a non-zero exit code.
#[derive(Error, Debug)]
pub(crate) enum CliError {
    /// Backend, transport or decoding failure.
    #[error(transparent)]
    Farm(#[from] FarmError),

    /// Output could not be serialized.
    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    /// The section ended in an error state; carries the message it shows.
    #[error("{0}")]
    Section(String),

    /// `--sort-by` named no column of the rendered table.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// `/health` answered with a status other than `healthy`.
    #[error("Backend is unhealthy: {0}")]
    Unhealthy(String),
}

/// Result type alias using [`CliError`].
pub(crate) type Result<T> = std::result::Result<T, CliError>;
