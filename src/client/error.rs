//! Error types for the remote chat endpoint.

use thiserror::Error;

/// Failure talking to the chat endpoint.
///
/// The widget never shows these to the visitor; every variant turns into the
/// same fallback line.
#[derive(Error, Debug)]
pub enum ChatError {
    /// Transport failure (connection refused, DNS, reset, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not JSON.
    #[error("JSON error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Response body was JSON `null`.
    #[error("Response body was null")]
    EmptyBody,

    /// Endpoint could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

/// Result type alias for chat endpoint calls.
pub type Result<T> = std::result::Result<T, ChatError>;
