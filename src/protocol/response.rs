//! Response definitions
//!
//! Represents a backend's reply to one request.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use bytes::Bytes;

use crate::error::DecodeError;

/// Backend outcome classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The request succeeded
    Ok,
    /// Retryable failure
    TempFail,
    /// Permanent failure
    PermFail,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::TempFail => "tempfail",
            Status::PermFail => "permfail",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = DecodeError;

    /// Case-sensitive: `OK` is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ok" => Ok(Status::Ok),
            "tempfail" => Ok(Status::TempFail),
            "permfail" => Ok(Status::PermFail),
            other => Err(DecodeError::UnknownStatus(other.to_string())),
        }
    }
}

/// A decoded response line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    /// Id of the request this answers
    pub request_id: u64,

    /// Outcome
    pub status: Status,

    /// Everything after the status field, verbatim. Its structure depends on
    /// the operation that was requested (empty for open/update/close acks)
    /// and it need not be UTF-8.
    pub payload: Bytes,
}

impl ParsedResponse {
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    /// Payload as text, if it is valid UTF-8
    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }

    /// Payload as text, with invalid sequences replaced
    pub fn payload_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }
}
