//! Expectation evaluation and schema validation against a mock service

use anyhow::bail;
use pincheck_client::models::{ListPinsQuery, Pin};
use pincheck_harness::{ApiCall, CheckEnv};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn test_schema_runs_as_the_first_expectation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pins"))
        .respond_with(
            ResponseTemplate::new(202).set_body_json(common::pin_status_json("req-1", "queued")),
        )
        .mount(&server)
        .await;

    let env = CheckEnv::new();
    let pin = Pin::new(common::TEST_CID.parse().unwrap());
    let mut call = ApiCall::new(&env, &common::test_pair(&server), "Create a pin", move |client| {
        let pin = pin.clone();
        async move { client.add_pin(&pin).await }
    })
    .unwrap()
    .with_schema(env.schema("PinStatus").unwrap());

    call.expect("Returns a 202", |outcome| Ok(outcome.status() == Some(202)));

    let report = call.run_expectations().await;

    assert!(report.passed());
    assert_eq!(report.expectations.len(), 2);
    assert_eq!(
        report.expectations[0].title,
        "response body matches PinStatus schema"
    );
    assert!(report.expectations[0].passed);
    assert_eq!(report.expectations[1].title, "Returns a 202");
}

#[tokio::test]
async fn test_schema_violation_fails_the_report() {
    let server = MockServer::start().await;
    // Decodes into the typed model but is missing the delegates array the
    // schema insists on.
    Mock::given(method("POST"))
        .and(path("/pins"))
        .respond_with(ResponseTemplate::new(202).set_body_json(serde_json::json!({
            "requestid": "req-2",
            "status": "queued",
            "created": "2024-01-15T10:30:00Z",
            "pin": { "cid": common::TEST_CID }
        })))
        .mount(&server)
        .await;

    let env = CheckEnv::new();
    let pin = Pin::new(common::TEST_CID.parse().unwrap());
    let mut call = ApiCall::new(&env, &common::test_pair(&server), "Create a pin", move |client| {
        let pin = pin.clone();
        async move { client.add_pin(&pin).await }
    })
    .unwrap()
    .with_schema(env.schema("PinStatus").unwrap());

    call.expect("Returns a 202", |outcome| Ok(outcome.status() == Some(202)));

    assert!(call.outcome().await.succeeded());

    let report = call.run_expectations().await;

    assert!(!report.passed());
    assert!(!report.expectations[0].passed);
    let reason = report.expectations[0].reason.as_deref().unwrap();
    assert!(reason.contains("delegates"), "unexpected reason: {reason}");
    // The status expectation after the failing schema still ran and passed.
    assert!(report.expectations[1].passed);
}

#[tokio::test]
async fn test_predicate_errors_are_reported_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pins"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "count": 0,
            "results": []
        })))
        .mount(&server)
        .await;

    let env = CheckEnv::new();
    let mut call = ApiCall::new(&env, &common::test_pair(&server), "List pins", |client| {
        async move { client.list_pins(&ListPinsQuery::default()).await }
    })
    .unwrap();

    call.expect("Returns a 200", |outcome| Ok(outcome.status() == Some(200)));
    call.expect("Inspects a missing field", |outcome| {
        let Some(body) = outcome.json() else {
            bail!("no body to inspect");
        };
        match body.get("bogus") {
            Some(value) => Ok(value.is_string()),
            None => bail!("response has no bogus field"),
        }
    });
    call.expect("Count is zero", |outcome| {
        Ok(outcome.json().is_some_and(|body| body["count"] == 0))
    });

    let report = call.run_expectations().await;

    assert!(!report.passed());
    assert_eq!(report.expectations.len(), 3);
    assert!(report.expectations[0].passed);
    assert!(!report.expectations[1].passed);
    assert!(report.expectations[1]
        .reason
        .as_deref()
        .unwrap()
        .contains("no bogus field"));
    assert!(report.expectations[2].passed);
}

#[tokio::test]
async fn test_expectations_decide_for_a_rejected_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pins"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": { "reason": "UNAUTHORIZED", "details": "Bad token" }
        })))
        .mount(&server)
        .await;

    let env = CheckEnv::new();
    let mut call = ApiCall::new(&env, &common::test_pair(&server), "List pins", |client| {
        async move { client.list_pins(&ListPinsQuery::default()).await }
    })
    .unwrap()
    .with_schema(env.schema("Failure").unwrap());

    call.expect("Returns a 403", |outcome| Ok(outcome.status() == Some(403)));

    let report = call.run_expectations().await;

    // The client surfaced an API error, but the expectations all held, so the
    // call as a whole passes.
    assert!(report.passed());
    assert!(report.error.is_some());
    assert!(report.expectations.iter().all(|e| e.passed));
}
