//! Backend Tests
//!
//! Table handle, pending-request correlation and response dispatch.

mod table_tests;
