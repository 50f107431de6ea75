//! Failure taxonomy for catalog requests.

use thiserror::Error;

/// Error returned by every catalog service operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request never produced a response (DNS, connect, timeout, body read).
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: wreq::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("Request to {url} failed with status: {status}")]
    Status { url: String, status: u16 },

    /// The body did not match the expected JSON shape.
    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ServiceError {
    /// Returns the HTTP status for status errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the URL of the failed request.
    pub fn url(&self) -> &str {
        match self {
            ServiceError::Transport { url, .. }
            | ServiceError::Status { url, .. }
            | ServiceError::Decode { url, .. } => url,
        }
    }
}

/// Outcome of a catalog operation.
pub type Result<T> = std::result::Result<T, ServiceError>;
