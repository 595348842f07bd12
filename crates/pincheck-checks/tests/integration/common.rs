//! Shared fixtures for check integration tests

use pincheck_core::{AccessToken, ServiceEndpoint, ServiceTokenPair};
use wiremock::MockServer;

pub const TEST_CID: &str = "QmPK1s3pNYLi9ERiq3BDxKa4XosgWwFRQUydHUtz4YgpqB";

/// Builds the endpoint/token pair for a running mock server.
pub fn test_pair(server: &MockServer) -> ServiceTokenPair {
    ServiceTokenPair::new(
        ServiceEndpoint::parse(&server.uri()).unwrap(),
        AccessToken::new("test-access-token".to_string()).unwrap(),
    )
}

/// A complete pin status body as a compliant service would return it.
pub fn pin_status_json(requestid: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "requestid": requestid,
        "status": status,
        "created": "2024-01-15T10:30:00Z",
        "pin": { "cid": TEST_CID },
        "delegates": ["/ip4/203.0.113.1/tcp/4001/p2p/QmServicePeerId"]
    })
}
