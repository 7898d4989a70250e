//! Table operations
//!
//! Represents the requests the lookup engine sends to a table backend.

use std::fmt;
use std::str::FromStr;

use crate::error::DecodeError;
use super::Service;

/// Event tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    Open,
    Update,
    Close,
    Lookup,
    Fetch,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::Open => "open",
            Event::Update => "update",
            Event::Close => "close",
            Event::Lookup => "lookup",
            Event::Fetch => "fetch",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Event {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Event::Open),
            "update" => Ok(Event::Update),
            "close" => Ok(Event::Close),
            "lookup" => Ok(Event::Lookup),
            "fetch" => Ok(Event::Fetch),
            other => Err(DecodeError::UnknownEvent(other.to_string())),
        }
    }
}

/// A table operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableOperation {
    /// Ask the backend to open the table
    Open,

    /// Ask the backend to reload its data
    Update,

    /// Ask the backend to close the table
    Close,

    /// Look up a single key
    Lookup { service: Service, key: String },

    /// Fetch the next entry for a service (iteration)
    Fetch { service: Service },
}

impl TableOperation {
    /// Get the event tag
    pub fn event(&self) -> Event {
        match self {
            TableOperation::Open => Event::Open,
            TableOperation::Update => Event::Update,
            TableOperation::Close => Event::Close,
            TableOperation::Lookup { .. } => Event::Lookup,
            TableOperation::Fetch { .. } => Event::Fetch,
        }
    }

    /// Service kind, for operations that carry one
    pub fn service(&self) -> Option<Service> {
        match self {
            TableOperation::Lookup { service, .. } | TableOperation::Fetch { service } => {
                Some(*service)
            }
            _ => None,
        }
    }
}
