//! Errors reported by blob store clients.

use thiserror::Error;

/// Failure of a call against the remote blob store.
///
/// Nothing above the client retries these; they propagate to the caller as-is.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed blob does not exist.
    #[error("Blob not found: {id}")]
    NotFound {
        /// Blob ID that was requested.
        id: String,
    },

    /// The request failed (network, server error, rejected request).
    #[error("Store request failed: {message}")]
    Request {
        /// Description of the failure.
        message: String,
    },

    /// The server answered with something that violates the protocol.
    #[error("Store protocol error: {message}")]
    Protocol {
        /// Description of the violation.
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }
}
