//! End to end runs of the invalid-bearer-token check

use pincheck_checks::InvalidBearerToken;
use pincheck_harness::{Check, CheckEnv};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn test_rejected_token_passes_the_check() {
    let server = MockServer::start().await;
    // Only the deliberately broken token is expected on the wire.
    Mock::given(method("GET"))
        .and(path("/pins"))
        .and(header("authorization", "Bearer purposefullyInvalid"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": { "reason": "UNAUTHORIZED", "details": "Invalid bearer token" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = InvalidBearerToken
        .run(&CheckEnv::new(), &common::test_pair(&server))
        .await
        .unwrap();

    assert!(outcome.passed());
    assert_eq!(outcome.calls.len(), 1);

    let report = &outcome.calls[0];
    assert_eq!(report.title, "Request with invalid token");
    assert_eq!(report.expectations.len(), 2);
    assert_eq!(
        report.expectations[0].title,
        "response body matches Failure schema"
    );
    assert_eq!(report.expectations[1].title, "Returns a 403");
    assert!(report.expectations.iter().all(|e| e.passed));
    // The client reported the 403 as an error; the expectations own the verdict.
    assert!(report.error.is_some());
}

#[tokio::test]
async fn test_accepting_the_token_fails_the_check() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pins"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "count": 0,
            "results": []
        })))
        .mount(&server)
        .await;

    let outcome = InvalidBearerToken
        .run(&CheckEnv::new(), &common::test_pair(&server))
        .await
        .unwrap();

    // A service that serves the request anyway violates both the schema
    // expectation and the status expectation.
    assert!(!outcome.passed());

    let report = &outcome.calls[0];
    assert!(!report.expectations[0].passed);
    assert!(!report.expectations[1].passed);
}
