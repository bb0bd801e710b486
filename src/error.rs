//! Error types for paper-digest.
//!
//! Fetch and store failures are fatal and travel up to `main` as
//! [`DigestError`]. Summarization never produces one; it reports through
//! [`crate::models::SummarizationResult`] instead.

use std::path::PathBuf;

/// Top-level error type for a digest run.
#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Transport-level failure talking to an external service.
    #[error("{service} request failed: {source}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// An external service answered with a non-success status.
    #[error("{service} returned status {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// The paper feed could not be parsed.
    #[error("feed parse error: {message}")]
    Feed { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A JSON configuration file did not match the expected shape.
    #[error("invalid JSON in {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DigestError>;

impl DigestError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a feed parse error from any displayable message.
    pub fn feed(msg: impl Into<String>) -> Self {
        Self::Feed {
            message: msg.into(),
        }
    }

    /// Wrap a transport error with the name of the service being called.
    pub fn request(service: &'static str, source: reqwest::Error) -> Self {
        Self::Request { service, source }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
