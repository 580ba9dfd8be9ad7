//! Integration tests for the ORTB acknowledgment endpoint.
//!
//! These tests send real HTTP requests to an in-process instance of the
//! gateway and check status codes, headers and the decompressed summaries.

pub mod common;
