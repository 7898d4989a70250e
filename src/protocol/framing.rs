//! Line framing
//!
//! Splits a raw byte stream into complete lines for the decoder. Partial
//! lines stay buffered until their newline arrives.

use bytes::{Buf, Bytes, BytesMut};

use crate::error::DecodeError;
use super::codec::NEWLINE;

/// Accumulates transport chunks and yields newline-delimited lines
pub struct LineFramer {
    /// Bytes received but not yet returned as a line
    buffer: BytesMut,

    /// Longest accepted line, newline excluded
    max_line_length: usize,

    /// Set after an oversized partial line: drop input up to the next newline
    discarding: bool,
}

impl LineFramer {
    pub fn new(max_line_length: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(max_line_length.min(64 * 1024) + 1),
            max_line_length,
            discarding: false,
        }
    }

    /// Append a chunk received from the transport
    pub fn push(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Next complete line, without its newline
    ///
    /// Returns `None` when more input is needed. An oversized line yields
    /// `LineTooLong` once; its remaining bytes are dropped.
    pub fn next_line(&mut self) -> Option<Result<Bytes, DecodeError>> {
        loop {
            let newline = self.buffer.iter().position(|&b| b == NEWLINE);

            if self.discarding {
                match newline {
                    Some(pos) => {
                        self.buffer.advance(pos + 1);
                        self.discarding = false;
                        continue;
                    }
                    None => {
                        self.buffer.clear();
                        return None;
                    }
                }
            }

            return match newline {
                Some(pos) if pos > self.max_line_length => {
                    self.buffer.advance(pos + 1);
                    Some(Err(DecodeError::LineTooLong {
                        len: pos,
                        max: self.max_line_length,
                    }))
                }
                Some(pos) => {
                    let mut line = self.buffer.split_to(pos + 1);
                    line.truncate(pos);
                    Some(Ok(line.freeze()))
                }
                None if self.buffer.len() > self.max_line_length => {
                    let len = self.buffer.len();
                    self.buffer.clear();
                    self.discarding = true;
                    Some(Err(DecodeError::LineTooLong {
                        len,
                        max: self.max_line_length,
                    }))
                }
                None => None,
            };
        }
    }

    /// Number of buffered bytes not yet returned
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}
