//! Request-id generation
//!
//! Each request line carries a 64-bit token that its response echoes back.

use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out process-unique request ids
///
/// Owned explicitly and shared by reference (or `Arc`) between the tables
/// that should draw from the same id space. Ids are never 0.
#[derive(Debug)]
pub struct RequestIdGenerator {
    next: AtomicU64,
}

impl RequestIdGenerator {
    /// Start counting from 1
    pub fn new() -> Self {
        Self::with_seed(1)
    }

    /// Start counting from `seed` (0 is bumped to 1)
    pub fn with_seed(seed: u64) -> Self {
        Self {
            next: AtomicU64::new(seed.max(1)),
        }
    }

    /// Consume and return a fresh id
    pub fn next_id(&self) -> u64 {
        loop {
            let id = self.next.fetch_add(1, Ordering::Relaxed);
            // Skip 0 after wrap-around.
            if id != 0 {
                return id;
            }
        }
    }
}

impl Default for RequestIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
