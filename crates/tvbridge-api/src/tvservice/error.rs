//! TV service client error types.

use thiserror::Error;

/// Transport-level failure of a TV service call.
#[derive(Debug, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum TvServiceError {
    /// Client construction or URL assembly failed.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    /// The request could not be sent or the connection failed.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-success HTTP status.
    #[error("HTTP error {status} for {url}")]
    Http {
        /// Response status code.
        status: reqwest::StatusCode,
        /// Request URL.
        url: String,
    },

    /// The response body could not be decoded as the expected type.
    #[error("failed to decode {command} response: {message}")]
    Decode {
        /// Backend command name.
        command: String,
        /// Decoder failure detail.
        message: String,
    },

    /// The operation's cancellation signal fired.
    #[error("operation cancelled")]
    Cancelled,
}

impl TvServiceError {
    /// Whether this is an HTTP 404 from the backend.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status, .. } if *status == reqwest::StatusCode::NOT_FOUND)
    }
}
