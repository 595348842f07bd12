//! Shared test helpers for pinning service integration tests
//!
//! Provides wiremock-based mock server setup. Each helper mounts the
//! endpoints a test needs and returns a configured client pointing at the
//! mock server.

use std::sync::Arc;

use pincheck_client::client::PinningClient;
use pincheck_client::middleware::Middleware;
use pincheck_client::rate_limit::RateLimitTracker;
use pincheck_core::{AccessToken, ServiceEndpoint, ServiceTokenPair};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_CID: &str = "QmPK1s3pNYLi9ERiq3BDxKa4XosgWwFRQUydHUtz4YgpqB";

/// Builds the endpoint/token pair for a running mock server.
pub fn test_pair(server: &MockServer) -> ServiceTokenPair {
    ServiceTokenPair::new(
        ServiceEndpoint::parse(&server.uri()).unwrap(),
        AccessToken::new("test-access-token".to_string()).unwrap(),
    )
}

/// Starts a mock pinning service and returns it with a client pointed at it.
///
/// Uses a dedicated (non-pooled) server so dropping it closes the port.
pub async fn setup() -> (MockServer, PinningClient) {
    let server = MockServer::builder().start().await;
    let client = PinningClient::new(&test_pair(&server));
    (server, client)
}

/// Starts a mock pinning service and a client whose middleware shares the
/// given tracker.
pub async fn setup_with_tracker(tracker: Arc<RateLimitTracker>) -> (MockServer, PinningClient) {
    let server = MockServer::start().await;
    let client = PinningClient::new(&test_pair(&server)).with_middleware(Middleware::new(tracker));
    (server, client)
}

/// A wire-accurate pin status body for the given request id and cid.
pub fn pin_status_json(requestid: &str, status: &str, cid: &str) -> serde_json::Value {
    serde_json::json!({
        "requestid": requestid,
        "status": status,
        "created": "2026-08-01T12:00:00Z",
        "pin": { "cid": cid },
        "delegates": ["/ip4/203.0.113.1/tcp/4001/p2p/QmServicePeer"]
    })
}

/// Mounts GET /pins returning the given pin statuses.
pub async fn mount_list_pins(server: &MockServer, results: Vec<serde_json::Value>) {
    let count = results.len();
    Mock::given(method("GET"))
        .and(path("/pins"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "count": count,
            "results": results
        })))
        .mount(server)
        .await;
}
