//! Protocol Tests
//!
//! Encoder, decoder, service mapping and line framing.

mod request_decode_tests;
