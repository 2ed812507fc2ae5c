//! Error types

use thiserror::Error;

/// Errors raised while talking to remote services
#[derive(Debug, Error)]
pub enum Error {
    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status, with the message reported by the server
    #[error("{status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("unexpected response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTML error: {0}")]
    Html(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for remote operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for notion2md_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(e) => notion2md_core::Error::Io(e),
            Error::Json(e) => notion2md_core::Error::MalformedInput(e.to_string()),
            other => notion2md_core::Error::Fetch(other.to_string()),
        }
    }
}
