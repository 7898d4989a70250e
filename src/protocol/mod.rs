//! Protocol Module
//!
//! Defines the line-based wire protocol between the lookup engine and table
//! backends.
//!
//! ## Protocol Format (Version 0.1 - Text Lines)
//!
//! ### Request Format
//! ```text
//! ┌───────┬─────────┬────────────┬──────────┬───────┬───────┬──────────┐
//! │ table │ version │ sec.usec6  │ id16hex  │ event │ table │ extra... │
//! └───────┴─────────┴────────────┴──────────┴───────┴───────┴──────────┘
//! ```
//!
//! ### Events
//! - open, update, close: no extra fields
//! - lookup: `service|key`
//! - fetch:  `service`
//!
//! ### Response Format
//! ```text
//! ┌───────────────┬──────────┬────────┬─────────────────┐
//! │ table-result  │ id16hex  │ status │     payload     │
//! └───────────────┴──────────┴────────┴─────────────────┘
//! ```
//!
//! ### Status Codes
//! - ok: succeeded
//! - tempfail: retryable failure
//! - permfail: permanent failure

mod service;
mod operation;
mod request;
mod request_id;
mod response;
mod codec;
mod framing;

pub use service::Service;
pub use operation::{Event, TableOperation};
pub use request::{DecodedRequest, Request, Timestamp};
pub use request_id::RequestIdGenerator;
pub use response::{ParsedResponse, Status};
pub use codec::{
    decode_request, decode_response, encode_request, encode_response, read_response,
    write_request, DELIMITER, HEADER_FIELDS, NEWLINE, REQUEST_LITERAL,
};
pub use framing::LineFramer;

pub(crate) use codec::validate_field;
