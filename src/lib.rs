//! # tableproc
//!
//! Request/response framing between a mail-routing lookup engine and its
//! table backends (files, databases, directory services):
//! - One text line per table operation (open/update/close/lookup/fetch)
//! - Strict, total parsing of backend replies into `{id, status, payload}`
//! - Correlation of out-of-order replies by request id
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────┐  Table::lookup()  ┌─────────────┐  request line  ┌─────────┐
//! │ Lookup logic ├──────────────────►│   Encoder   ├───────────────►│         │
//! └──────▲───────┘                   └─────────────┘                │ Backend │
//!        │                                                          │ process │
//!        │ ParsedResponse  ┌─────────────────┐  response line       │         │
//!        └─────────────────┤ Decoder/Pending │◄─────────────────────┤         │
//!                          └─────────────────┘                      └─────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod backend;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{DecodeError, Result, TableError};
pub use config::ProtocolConfig;
pub use protocol::{ParsedResponse, Service, Status, TableOperation};
pub use backend::{PendingRequests, Table};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of tableproc
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
