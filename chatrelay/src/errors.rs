//! Error types for the chatrelay bridge.
//!
//! The taxonomy separates the failure kinds a send cycle can surface:
//! timeouts and cancellations (abort-class), transport failures, and
//! non-success HTTP statuses. All of them are soft failures at the bridge
//! level - the bridge reports them to the transcript and returns to ready.

use thiserror::Error;

/// The main error type for relay operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RelayError {
    /// The request exceeded the configured timeout and was aborted.
    #[error("request timed out")]
    Timeout,

    /// The in-flight request was cancelled before completion.
    #[error("request cancelled: {0}")]
    Cancelled(String),

    /// A transport-level failure (DNS, connect, TLS, read).
    #[error("transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success HTTP status.
    #[error("endpoint returned status {code}")]
    HttpStatus {
        /// The HTTP status code.
        code: u16,
    },

    /// The configured endpoint is not a usable URL.
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// The offending endpoint value.
        endpoint: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl RelayError {
    /// Whether this error is abort-class (timeout or cancellation).
    #[must_use]
    pub fn is_abort(&self) -> bool {
        matches!(self, Self::Timeout | Self::Cancelled(_))
    }

    /// The HTTP status code, if this is a status error.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { code } => Some(*code),
            _ => None,
        }
    }
}
