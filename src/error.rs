//! Error types for Snyk API and export operations.

use thiserror::Error;

/// Errors that can occur while talking to the Snyk API or writing exports.
#[derive(Debug, Error)]
pub enum SnykError {
    /// Configuration is missing or incomplete.
    #[error("Snyk configuration required: {0}")]
    ConfigMissing(String),

    /// Conflicting or incomplete command-line selection.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// Entity not found.
    #[error("{entity_type} '{id}' not found")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// API request failed.
    #[error("Snyk API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Failed to write an output file.
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),

    /// One or more organization exports failed in group mode.
    #[error("export failed for organization(s): {0}")]
    ExportFailed(String),
}

/// Result type alias for Snyk operations.
pub type Result<T> = core::result::Result<T, SnykError>;
