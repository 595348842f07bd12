//! Integration tests for pincheck-client
//!
//! Uses wiremock to simulate a pinning service and verifies end-to-end
//! behavior of the typed client, the response normalizer, and the rate
//! limit tracker.

mod common;

mod test_normalize;
mod test_rate_limit;
