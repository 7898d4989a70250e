//! Request definitions
//!
//! A request as it travels on the wire, before encoding or after decoding.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::DecodeError;
use super::TableOperation;

/// Wall-clock time with microsecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Timestamp {
    pub secs: i64,
    /// Always below 1_000_000
    pub micros: u32,
}

impl Timestamp {
    pub fn new(secs: i64, micros: u32) -> Self {
        Self {
            secs: secs + i64::from(micros / 1_000_000),
            micros: micros % 1_000_000,
        }
    }

    /// Current wall-clock time (the epoch if the clock is set before it)
    pub fn now() -> Self {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self {
            secs: elapsed.as_secs() as i64,
            micros: elapsed.subsec_micros(),
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}", self.secs, self.micros)
    }
}

impl FromStr for Timestamp {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DecodeError::MalformedFraming(format!("invalid timestamp {:?}", s));

        let (secs, micros) = s.split_once('.').ok_or_else(invalid)?;
        if micros.len() != 6 || !micros.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let secs = secs.parse::<i64>().map_err(|_| invalid())?;
        let micros = micros.parse::<u32>().map_err(|_| invalid())?;

        Ok(Self { secs, micros })
    }
}

/// One request addressed to a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Correlation token echoed by the response
    pub request_id: u64,

    /// When the request was issued
    pub timestamp: Timestamp,

    /// Logical table name
    pub table: String,

    /// What to do
    pub operation: TableOperation,
}

/// A request line parsed on the backend side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRequest {
    /// Version field as sent by the engine
    pub protocol_version: String,

    pub request: Request,
}
