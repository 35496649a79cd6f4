//! Index backend error types.
//!
//! These are operational failures. Evaluation reports them per configuration
//! rather than propagating them.

use thiserror::Error;

/// Errors that can occur while talking to the index backend.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// Failed to establish connection to the search engine.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The request could not be sent or its response could not be read.
    #[error("Request error: {0}")]
    RequestError(String),

    /// The backend answered with an unexpected status.
    #[error("Unexpected response status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
}

impl BackendError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a request error.
    pub fn request(msg: impl Into<String>) -> Self {
        Self::RequestError(msg.into())
    }

    /// Create an unexpected status error.
    pub fn unexpected_status(status: u16, body: impl Into<String>) -> Self {
        Self::UnexpectedStatus {
            status,
            body: body.into(),
        }
    }
}
