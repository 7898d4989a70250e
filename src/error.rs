//! Error types for tableproc
//!
//! Provides a unified error type for all operations, plus the closed set of
//! decode failures produced when a backend line cannot be parsed.

use thiserror::Error;

/// Result type alias using TableError
pub type Result<T> = std::result::Result<T, TableError>;

/// Unified error type for tableproc operations
#[derive(Debug, Error)]
pub enum TableError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    /// Transport fault. Fatal for the channel: no partial-line recovery exists.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Encode Errors
    // -------------------------------------------------------------------------
    #[error("Invalid {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },

    // -------------------------------------------------------------------------
    // Decode Errors
    // -------------------------------------------------------------------------
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Why a received line was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed framing: {0}")]
    MalformedFraming(String),

    #[error("line too long: {len} bytes (max {max})")]
    LineTooLong { len: usize, max: usize },

    #[error("invalid request id")]
    InvalidRequestId,

    #[error("unknown status: {0:?}")]
    UnknownStatus(String),

    #[error("line is not valid UTF-8")]
    InvalidUtf8,

    #[error("unknown event: {0:?}")]
    UnknownEvent(String),

    #[error("unknown service: {0:?}")]
    UnknownService(String),
}
