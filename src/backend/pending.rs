//! Pending requests
//!
//! Correlates responses with the requests that are still waiting for them.
//! Backends may answer out of order, so matching is strictly by request id.

use std::collections::HashMap;

use crossbeam::channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;

use crate::protocol::ParsedResponse;

/// Requests sent and not yet answered
#[derive(Default)]
pub struct PendingRequests {
    waiting: Mutex<HashMap<u64, Sender<ParsedResponse>>>,
}

impl PendingRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start waiting for `request_id`
    ///
    /// Registering the same id twice replaces the earlier waiter.
    pub fn register(&self, request_id: u64) -> Receiver<ParsedResponse> {
        let (tx, rx) = bounded(1);
        self.waiting.lock().insert(request_id, tx);
        rx
    }

    /// Hand a response to its waiter
    ///
    /// Returns false for an unknown, cancelled or already answered id; such
    /// late replies are dropped.
    pub fn complete(&self, response: ParsedResponse) -> bool {
        let waiter = self.waiting.lock().remove(&response.request_id);

        match waiter {
            Some(tx) => {
                let request_id = response.request_id;
                if tx.send(response).is_err() {
                    tracing::debug!("Waiter for request {:016x} went away", request_id);
                    return false;
                }
                true
            }
            None => {
                tracing::debug!(
                    "Dropping reply for unknown request {:016x}",
                    response.request_id
                );
                false
            }
        }
    }

    /// Stop waiting for `request_id`; returns whether it was pending
    pub fn cancel(&self, request_id: u64) -> bool {
        self.waiting.lock().remove(&request_id).is_some()
    }

    /// Forget every waiter (their receivers see a disconnect)
    pub fn clear(&self) {
        self.waiting.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.waiting.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.lock().is_empty()
    }
}
