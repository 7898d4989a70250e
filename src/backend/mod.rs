//! Backend Module
//!
//! Engine-side plumbing around the codec.
//!
//! ## Architecture
//! - `Table` writes one request line per operation to the backend sink
//! - `PendingRequests` keys waiters by request id
//! - `dispatch_responses` drains backend output into the pending table

mod table;
mod pending;
mod dispatch;

pub use table::Table;
pub use pending::PendingRequests;
pub use dispatch::dispatch_responses;
