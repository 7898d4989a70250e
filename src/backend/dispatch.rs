//! Response dispatcher
//!
//! Reads a backend's output and routes each reply to its waiter.

use std::io::{BufRead, ErrorKind};

use crate::config::ProtocolConfig;
use crate::error::{Result, TableError};
use crate::protocol::read_response;
use super::PendingRequests;

/// Read responses until the backend closes its output
///
/// Returns the number of responses decoded. A malformed line stops the loop
/// with its `DecodeError`: the stream cannot be trusted after that, and the
/// caller decides whether to tear down the channel. Waiters still pending
/// when the loop ends are left registered.
pub fn dispatch_responses<R: BufRead>(
    reader: &mut R,
    pending: &PendingRequests,
    config: &ProtocolConfig,
) -> Result<u64> {
    let mut received = 0u64;

    loop {
        let response = match read_response(reader, config) {
            Ok(Some(response)) => response,
            Ok(None) => {
                tracing::debug!("Backend closed its output after {} responses", received);
                return Ok(received);
            }
            Err(TableError::Io(ref e))
                if matches!(
                    e.kind(),
                    ErrorKind::UnexpectedEof
                        | ErrorKind::ConnectionReset
                        | ErrorKind::ConnectionAborted
                        | ErrorKind::BrokenPipe
                ) =>
            {
                tracing::debug!("Backend connection lost: {}", e);
                return Ok(received);
            }
            Err(e) => {
                tracing::warn!("Stopping response dispatch: {}", e);
                return Err(e);
            }
        };

        received += 1;
        tracing::trace!(
            "Received {} for request {:016x}",
            response.status,
            response.request_id
        );

        pending.complete(response);
    }
}
