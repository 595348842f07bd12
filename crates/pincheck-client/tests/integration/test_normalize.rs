//! Response normalization behavior observed through a transcript hook

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pincheck_client::client::PinningClient;
use pincheck_client::detail::CallDetail;
use pincheck_client::middleware::{CallHooks, Middleware};
use pincheck_client::models::{ListPinsQuery, Pin};
use pincheck_client::rate_limit::RateLimitTracker;
use pincheck_core::RequestId;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{self, TEST_CID};

#[derive(Default)]
struct Capture {
    detail: Mutex<Option<CallDetail>>,
}

impl Capture {
    fn take(&self) -> CallDetail {
        self.detail.lock().unwrap().take().expect("no transcript captured")
    }
}

#[async_trait]
impl CallHooks for Capture {
    async fn on_detail(&self, detail: &CallDetail) -> anyhow::Result<()> {
        *self.detail.lock().unwrap() = Some(detail.clone());
        Ok(())
    }
}

async fn setup_with_capture() -> (MockServer, PinningClient, Arc<Capture>) {
    let server = MockServer::start().await;
    let capture = Arc::new(Capture::default());
    let hook: Arc<dyn CallHooks> = Arc::clone(&capture) as Arc<dyn CallHooks>;
    let middleware = Middleware::new(Arc::new(RateLimitTracker::new())).with_hook(hook);
    let client = PinningClient::new(&common::test_pair(&server)).with_middleware(middleware);
    (server, client, capture)
}

#[tokio::test]
async fn test_json_body_yields_both_views() {
    let (server, client, capture) = setup_with_capture().await;
    common::mount_list_pins(&server, vec![common::pin_status_json("req-1", "pinned", TEST_CID)])
        .await;

    client.list_pins(&ListPinsQuery::default()).await.unwrap();

    let detail = capture.take();
    assert!(detail.errors.is_empty());
    assert!(detail.response.text.as_deref().unwrap_or("").contains("req-1"));
    let json = detail.response.json.expect("json view missing");
    assert_eq!(json["count"], 1);
}

#[tokio::test]
async fn test_malformed_json_keeps_text_and_records_error() {
    let (server, client, capture) = setup_with_capture().await;

    Mock::given(method("GET"))
        .and(path("/pins"))
        .respond_with(ResponseTemplate::new(200).set_body_string("oops not json"))
        .mount(&server)
        .await;

    // The typed call fails, but the transcript still carries everything
    // that could be decoded.
    client.list_pins(&ListPinsQuery::default()).await.unwrap_err();

    let detail = capture.take();
    assert!(detail.response.ok);
    assert_eq!(detail.response.text.as_deref(), Some("oops not json"));
    assert!(detail.response.json.is_none());
    assert_eq!(detail.errors.len(), 1);
    assert!(detail.errors[0].contains("JSON"));
}

#[tokio::test]
async fn test_no_content_response_has_no_views_and_no_errors() {
    let (server, client, capture) = setup_with_capture().await;

    Mock::given(method("DELETE"))
        .and(path("/pins/req-1"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let id: RequestId = "req-1".parse().unwrap();
    client.remove_pin(&id).await.unwrap();

    let detail = capture.take();
    assert_eq!(detail.response.status, 202);
    assert!(detail.response.ok);
    assert!(detail.response.text.is_none());
    assert!(detail.response.json.is_none());
    assert!(detail.errors.is_empty());
}

#[tokio::test]
async fn test_error_response_keeps_body_views() {
    let (server, client, capture) = setup_with_capture().await;

    Mock::given(method("GET"))
        .and(path("/pins"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": { "reason": "UNAUTHORIZED" }
        })))
        .mount(&server)
        .await;

    client.list_pins(&ListPinsQuery::default()).await.unwrap_err();

    let detail = capture.take();
    assert_eq!(detail.response.status, 403);
    assert!(!detail.response.ok);
    assert_eq!(detail.response.json.unwrap()["error"]["reason"], "UNAUTHORIZED");
    assert!(detail.errors.is_empty());
}

#[tokio::test]
async fn test_request_transcript_redacts_token_and_keeps_body() {
    let (server, client, capture) = setup_with_capture().await;

    Mock::given(method("POST"))
        .and(path("/pins"))
        .respond_with(
            ResponseTemplate::new(202)
                .set_body_json(common::pin_status_json("created-1", "queued", TEST_CID)),
        )
        .mount(&server)
        .await;

    let pin = Pin::new(TEST_CID.parse().unwrap());
    client.add_pin(&pin).await.unwrap();

    let detail = capture.take();
    assert_eq!(detail.request.method, "POST");
    assert_eq!(
        detail.request.headers.get("authorization").map(String::as_str),
        Some("<redacted>")
    );
    assert!(detail.request.body.as_deref().unwrap_or("").contains(TEST_CID));
}
