//! Table handle
//!
//! Sends requests for one logical table to its backend.

use std::io::Write;
use std::sync::Arc;

use crossbeam::channel::Receiver;
use parking_lot::Mutex;

use crate::config::ProtocolConfig;
use crate::error::Result;
use crate::protocol::{
    encode_request, validate_field, write_request, ParsedResponse, Request, RequestIdGenerator,
    Service, TableOperation, Timestamp,
};
use super::PendingRequests;

/// A named table bound to the sink of its backend
pub struct Table<W: Write> {
    /// Logical table name (delimiter-free, non-empty)
    name: String,

    /// Backend input; the lock keeps each line contiguous
    sink: Mutex<W>,

    /// Shared request-id source
    ids: Arc<RequestIdGenerator>,

    config: ProtocolConfig,
}

impl<W: Write> Table<W> {
    /// Create a table handle
    ///
    /// Fails if `name` is empty or contains `|` or a line break.
    pub fn new(
        name: impl Into<String>,
        sink: W,
        ids: Arc<RequestIdGenerator>,
        config: ProtocolConfig,
    ) -> Result<Self> {
        let name = name.into();
        validate_field("table name", &name)?;

        Ok(Self {
            name,
            sink: Mutex::new(sink),
            ids,
            config,
        })
    }

    /// Get the table name
    pub fn name(&self) -> &str {
        &self.name
    }

    // =========================================================================
    // Operations
    // =========================================================================

    pub fn open(&self) -> Result<u64> {
        self.request(TableOperation::Open)
    }

    pub fn update(&self) -> Result<u64> {
        self.request(TableOperation::Update)
    }

    pub fn close(&self) -> Result<u64> {
        self.request(TableOperation::Close)
    }

    pub fn lookup(&self, service: Service, key: impl Into<String>) -> Result<u64> {
        self.request(TableOperation::Lookup {
            service,
            key: key.into(),
        })
    }

    pub fn fetch(&self, service: Service) -> Result<u64> {
        self.request(TableOperation::Fetch { service })
    }

    /// Send an operation stamped with the current time
    ///
    /// Returns the request id the response will carry. A write failure is a
    /// transport fault: the channel must be torn down.
    pub fn request(&self, operation: TableOperation) -> Result<u64> {
        self.request_at(Timestamp::now(), operation)
    }

    /// Send an operation with an explicit timestamp
    pub fn request_at(&self, timestamp: Timestamp, operation: TableOperation) -> Result<u64> {
        let request_id = self.ids.next_id();
        self.send(request_id, timestamp, operation)?;
        Ok(request_id)
    }

    /// Register the request in `pending` before sending it, so a fast reply
    /// cannot race the registration
    pub fn submit(
        &self,
        pending: &PendingRequests,
        operation: TableOperation,
    ) -> Result<(u64, Receiver<ParsedResponse>)> {
        let request_id = self.ids.next_id();
        let receiver = pending.register(request_id);

        if let Err(e) = self.send(request_id, Timestamp::now(), operation) {
            pending.cancel(request_id);
            return Err(e);
        }

        Ok((request_id, receiver))
    }

    /// Consume the handle and return the sink
    pub fn into_sink(self) -> W {
        self.sink.into_inner()
    }

    fn send(&self, request_id: u64, timestamp: Timestamp, operation: TableOperation) -> Result<()> {
        let request = Request {
            request_id,
            timestamp,
            table: self.name.clone(),
            operation,
        };
        let line = encode_request(&self.config, &request)?;

        let mut sink = self.sink.lock();
        if let Err(e) = write_request(&mut *sink, &line) {
            tracing::error!("Failed to write to table {}: {}", self.name, e);
            return Err(e);
        }

        tracing::trace!(
            "Sent {} request {:016x} to table {}",
            request.operation.event(),
            request_id,
            self.name
        );
        Ok(())
    }
}
