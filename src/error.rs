//! Error types for the dispair library.

use std::time::Duration;

use thiserror::Error;

use crate::http::seconds_to_duration;

/// Errors raised by the client, its HTTP session and the gateway.
#[derive(Error, Debug)]
pub enum DispairError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Discord API returned a non-success status
    #[error("Discord API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Still rate limited after the configured number of attempts
    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimited { retry_after: f64 },

    /// Gateway protocol error
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// A request signature did not verify
    #[error("invalid request signature")]
    InvalidSignature,

    /// Invalid client configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Colour could not be parsed
    #[error("invalid colour: {0}")]
    Colour(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DispairError {
    /// Suggested delay before retrying, if Discord gave one.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => Some(seconds_to_duration(*retry_after)),
            _ => None,
        }
    }
}

/// Result type for dispair operations.
pub type DispairResult<T> = Result<T, DispairError>;
