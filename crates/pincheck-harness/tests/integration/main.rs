//! Integration tests for pincheck-harness
//!
//! Uses wiremock to simulate a pinning service and verifies that deferred
//! API calls execute exactly once and that expectation evaluation reports
//! what a compliance reader needs to see.

mod common;

mod test_expectations;
