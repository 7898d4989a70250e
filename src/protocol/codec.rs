//! Protocol codec
//!
//! Encoding and decoding functions for the table wire protocol.
//!
//! ## Wire Format
//!
//! ### Request Format
//! ```text
//! table|<version>|<sec>.<usec6>|<id16hex>|<event>|<table>[|<extra>...]\n
//! ```
//!
//! ### Extra Fields by Event
//! - open, update, close: none
//! - lookup:              `<service>|<key>`
//! - fetch:               `<service>`
//!
//! ### Response Format
//! ```text
//! table-result|<id16hex>|<status>|<payload>\n
//! ```

use std::io::{BufRead, Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use crate::config::ProtocolConfig;
use crate::error::{DecodeError, Result, TableError};
use super::{
    DecodedRequest, Event, ParsedResponse, Request, Service, Status, TableOperation, Timestamp,
};

/// Field separator
pub const DELIMITER: u8 = b'|';

/// Line terminator
pub const NEWLINE: u8 = b'\n';

/// Leading literal of every request line
pub const REQUEST_LITERAL: &str = "table";

/// Number of `|`-separated fields before any operation-specific extras
pub const HEADER_FIELDS: usize = 6;

// =============================================================================
// Request Encoding/Decoding
// =============================================================================

/// Encode a request to one newline-terminated line
///
/// Table names and keys are never escaped: a value containing the delimiter
/// or a line break is rejected with `TableError::InvalidField`.
pub fn encode_request(config: &ProtocolConfig, request: &Request) -> Result<String> {
    validate_field("protocol version", &config.protocol_version)?;
    validate_field("table name", &request.table)?;

    let mut line = format!(
        "{}|{}|{}|{:016x}|{}|{}",
        REQUEST_LITERAL,
        config.protocol_version,
        request.timestamp,
        request.request_id,
        request.operation.event(),
        request.table,
    );

    match &request.operation {
        TableOperation::Open | TableOperation::Update | TableOperation::Close => {}
        TableOperation::Lookup { service, key } => {
            validate_value("lookup key", key)?;
            line.push('|');
            line.push_str(service.as_str());
            line.push('|');
            line.push_str(key);
        }
        TableOperation::Fetch { service } => {
            line.push('|');
            line.push_str(service.as_str());
        }
    }

    line.push('\n');
    Ok(line)
}

/// Decode a request line (backend side)
///
/// A lookup key is taken as the remainder of the line, so it is the only
/// field that may itself contain a delimiter.
pub fn decode_request(
    config: &ProtocolConfig,
    line: &[u8],
) -> std::result::Result<DecodedRequest, DecodeError> {
    let line = strip_newline(line);
    check_length(config, line)?;
    let line = std::str::from_utf8(line).map_err(|_| DecodeError::InvalidUtf8)?;

    let fields: Vec<&str> = line.splitn(HEADER_FIELDS + 2, '|').collect();
    if fields.len() < HEADER_FIELDS {
        return Err(DecodeError::MalformedFraming(format!(
            "expected at least {} fields, got {}",
            HEADER_FIELDS,
            fields.len()
        )));
    }
    if fields[0] != REQUEST_LITERAL {
        return Err(DecodeError::MalformedFraming(format!(
            "unexpected leading literal {:?}",
            fields[0]
        )));
    }
    if fields[1].is_empty() {
        return Err(DecodeError::MalformedFraming("empty protocol version".to_string()));
    }

    let timestamp: Timestamp = fields[2].parse()?;
    let request_id = parse_request_id(fields[3].as_bytes())?;
    let event: Event = fields[4].parse()?;

    let table = fields[5];
    if table.is_empty() {
        return Err(DecodeError::MalformedFraming("empty table name".to_string()));
    }

    let extras = &fields[HEADER_FIELDS..];
    let operation = match (event, extras) {
        (Event::Open, []) => TableOperation::Open,
        (Event::Update, []) => TableOperation::Update,
        (Event::Close, []) => TableOperation::Close,
        (Event::Lookup, [service, key]) => TableOperation::Lookup {
            service: service.parse::<Service>()?,
            key: key.to_string(),
        },
        (Event::Fetch, [service]) => TableOperation::Fetch {
            service: service.parse::<Service>()?,
        },
        (event, extras) => {
            return Err(DecodeError::MalformedFraming(format!(
                "{} request with {} extra fields",
                event,
                extras.len()
            )))
        }
    };

    Ok(DecodedRequest {
        protocol_version: fields[1].to_string(),
        request: Request {
            request_id,
            timestamp,
            table: table.to_string(),
            operation,
        },
    })
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response line (backend side)
///
/// The payload is written verbatim and may hold any bytes except a line
/// break.
pub fn encode_response(
    config: &ProtocolConfig,
    request_id: u64,
    status: Status,
    payload: impl AsRef<[u8]>,
) -> Result<Bytes> {
    let payload = payload.as_ref();
    if payload.iter().any(|&b| b == NEWLINE || b == b'\r') {
        return Err(TableError::InvalidField {
            field: "payload",
            reason: "must not contain a line break",
        });
    }

    let header = format!("{}{:016x}|{}|", config.response_prefix, request_id, status);
    let mut line = BytesMut::with_capacity(header.len() + payload.len() + 1);
    line.extend_from_slice(header.as_bytes());
    line.extend_from_slice(payload);
    line.put_u8(NEWLINE);

    Ok(line.freeze())
}

/// Decode one response line received from a backend
///
/// The line may or may not still carry its trailing newline. Any input
/// yields either a parsed response or a specific `DecodeError`; the raw line
/// is logged on failure.
pub fn decode_response(
    config: &ProtocolConfig,
    line: &[u8],
) -> std::result::Result<ParsedResponse, DecodeError> {
    let result = parse_response_line(config, strip_newline(line));

    if let Err(ref e) = result {
        let shown = &line[..line.len().min(config.max_line_length)];
        tracing::warn!(
            "Invalid table-result: {}: {}",
            e,
            String::from_utf8_lossy(shown).escape_debug()
        );
    }

    result
}

fn parse_response_line(
    config: &ProtocolConfig,
    line: &[u8],
) -> std::result::Result<ParsedResponse, DecodeError> {
    // Step 1: bound the line and strip the literal prefix
    check_length(config, line)?;

    let prefix = config.response_prefix.as_bytes();
    if line.len() < prefix.len() {
        return Err(DecodeError::MalformedFraming(format!(
            "line shorter than prefix ({} < {} bytes)",
            line.len(),
            prefix.len()
        )));
    }
    let (head, rest) = line.split_at(prefix.len());
    if head != prefix {
        return Err(DecodeError::MalformedFraming(
            "unexpected response prefix".to_string(),
        ));
    }

    // Step 2: request id, up to the first delimiter
    let id_end = find_delimiter(rest).ok_or(DecodeError::InvalidRequestId)?;
    let request_id = parse_request_id(&rest[..id_end])?;
    let rest = &rest[id_end + 1..];

    // Step 3: status, up to the next delimiter
    let status_end = find_delimiter(rest)
        .ok_or_else(|| DecodeError::UnknownStatus(String::from_utf8_lossy(rest).into_owned()))?;
    let status_field = &rest[..status_end];
    let status = std::str::from_utf8(status_field)
        .map_err(|_| DecodeError::UnknownStatus(String::from_utf8_lossy(status_field).into_owned()))?
        .parse::<Status>()?;

    // Step 4: the rest is payload, verbatim and opaque
    let payload = Bytes::copy_from_slice(&rest[status_end + 1..]);

    Ok(ParsedResponse {
        request_id,
        status,
        payload,
    })
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Write one encoded line to a sink and flush it
pub fn write_request<W: Write>(writer: &mut W, line: &str) -> Result<()> {
    writer.write_all(line.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Read and decode one response line
///
/// Reads at most `max_line_length + 1` bytes, so an oversized line is
/// reported as `LineTooLong` instead of being buffered; the rest of that
/// line is skipped so the next call starts on a line boundary. Returns
/// `Ok(None)` on a clean end of stream.
pub fn read_response<R: BufRead>(
    reader: &mut R,
    config: &ProtocolConfig,
) -> Result<Option<ParsedResponse>> {
    let mut line = Vec::new();
    let limit = config.max_line_length as u64 + 1;
    let read = reader.by_ref().take(limit).read_until(NEWLINE, &mut line)?;

    if read == 0 {
        return Ok(None);
    }

    if line.last() != Some(&NEWLINE) {
        let err = if line.len() > config.max_line_length {
            skip_line(reader)?;
            DecodeError::LineTooLong {
                len: line.len(),
                max: config.max_line_length,
            }
        } else {
            DecodeError::MalformedFraming("unterminated line at end of stream".to_string())
        };
        tracing::warn!(
            "Invalid table-result: {}: {}",
            err,
            String::from_utf8_lossy(&line).escape_debug()
        );
        return Err(err.into());
    }

    Ok(Some(decode_response(config, &line)?))
}

/// Discard input up to and including the next newline, one buffer at a time
fn skip_line<R: BufRead>(reader: &mut R) -> std::io::Result<()> {
    loop {
        let buffer = reader.fill_buf()?;
        if buffer.is_empty() {
            return Ok(());
        }
        match buffer.iter().position(|&b| b == NEWLINE) {
            Some(pos) => {
                reader.consume(pos + 1);
                return Ok(());
            }
            None => {
                let len = buffer.len();
                reader.consume(len);
            }
        }
    }
}

// =============================================================================
// Field helpers
// =============================================================================

/// Parse 1..=16 significant hex digits; leading zeros are allowed
fn parse_request_id(digits: &[u8]) -> std::result::Result<u64, DecodeError> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_hexdigit) {
        return Err(DecodeError::InvalidRequestId);
    }
    let digits = std::str::from_utf8(digits).map_err(|_| DecodeError::InvalidRequestId)?;
    u64::from_str_radix(digits, 16).map_err(|_| DecodeError::InvalidRequestId)
}

fn find_delimiter(bytes: &[u8]) -> Option<usize> {
    bytes.iter().position(|&b| b == DELIMITER)
}

fn strip_newline(line: &[u8]) -> &[u8] {
    line.strip_suffix(&[NEWLINE]).unwrap_or(line)
}

fn check_length(config: &ProtocolConfig, line: &[u8]) -> std::result::Result<(), DecodeError> {
    if line.len() > config.max_line_length {
        return Err(DecodeError::LineTooLong {
            len: line.len(),
            max: config.max_line_length,
        });
    }
    Ok(())
}

pub(crate) fn validate_field(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(TableError::InvalidField {
            field,
            reason: "must not be empty",
        });
    }
    validate_value(field, value)
}

fn validate_value(field: &'static str, value: &str) -> Result<()> {
    if value.bytes().any(|b| b == DELIMITER) {
        return Err(TableError::InvalidField {
            field,
            reason: "must not contain '|'",
        });
    }
    if value.bytes().any(|b| b == b'\n' || b == b'\r') {
        return Err(TableError::InvalidField {
            field,
            reason: "must not contain a line break",
        });
    }
    Ok(())
}
