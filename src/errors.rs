//! Error types for LibreTranslate client operations

use thiserror::Error;

/// Errors surfaced by client operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration rejected at client construction
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Network-level failure the retry policy does not cover
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Every allowed attempt ended in a transient failure
    #[error("{method} {url} giving up after {attempts} attempt(s)")]
    RetriesExhausted {
        method: reqwest::Method,
        url: String,
        attempts: u32,
    },

    /// Non-success response whose body carried the error envelope
    ///
    /// Displays the server-provided message verbatim; this is how the remote
    /// API signals domain-level failures such as a bad language code.
    #[error("{message}")]
    Remote { status: u16, message: String },

    /// Request body could not be encoded, or a response body was not the
    /// expected JSON shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The caller's cancellation token fired before the call completed
    #[error("request cancelled")]
    Cancelled,
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Config {
            message: err.to_string(),
        }
    }
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, Error>;
