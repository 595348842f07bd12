//! Rate limit tracking wired through real requests

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use pincheck_client::models::ListPinsQuery;
use pincheck_client::rate_limit::RateLimitTracker;
use pincheck_core::RequestId;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common;

fn epoch_in(secs: i64) -> String {
    (Utc::now().timestamp() + secs).to_string()
}

/// Mounts GET /pins answering with an exhausted quota that resets at the
/// given epoch timestamp.
async fn mount_exhausted_listing(server: &MockServer, reset: &str) {
    Mock::given(method("GET"))
        .and(path("/pins"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "count": 0, "results": [] }))
                .append_header("x-ratelimit-limit", "100")
                .append_header("x-ratelimit-remaining", "0")
                .append_header("x-ratelimit-reset", reset),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_exhausted_quota_delays_next_request_in_bucket() {
    let tracker = Arc::new(RateLimitTracker::new());
    let (server, client) = common::setup_with_tracker(Arc::clone(&tracker)).await;
    mount_exhausted_listing(&server, &epoch_in(2)).await;

    let key = format!("GET:{}/pins", server.uri());

    // First request pays nothing and queues the recovery wait
    let first_started = Instant::now();
    client.list_pins(&ListPinsQuery::default()).await.unwrap();
    assert!(first_started.elapsed() < Duration::from_millis(900));
    assert_eq!(tracker.pending_waits(&key), 1);

    // Second request in the same bucket sleeps until the advertised reset
    let second_started = Instant::now();
    client.list_pins(&ListPinsQuery::default()).await.unwrap();
    assert!(
        second_started.elapsed() >= Duration::from_millis(800),
        "second request should have waited for the reset, took {:?}",
        second_started.elapsed()
    );
}

#[tokio::test]
async fn test_remaining_quota_queues_no_wait() {
    let tracker = Arc::new(RateLimitTracker::new());
    let (server, client) = common::setup_with_tracker(Arc::clone(&tracker)).await;

    Mock::given(method("GET"))
        .and(path("/pins"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "count": 0, "results": [] }))
                .append_header("x-ratelimit-remaining", "42")
                .append_header("x-ratelimit-reset", &epoch_in(60)),
        )
        .mount(&server)
        .await;

    client.list_pins(&ListPinsQuery::default()).await.unwrap();

    assert_eq!(tracker.pending_waits(&format!("GET:{}/pins", server.uri())), 0);
}

#[tokio::test]
async fn test_waits_are_scoped_to_their_bucket() {
    let tracker = Arc::new(RateLimitTracker::new());
    let (server_a, client_a) = common::setup_with_tracker(Arc::clone(&tracker)).await;
    let (server_b, client_b) = common::setup_with_tracker(Arc::clone(&tracker)).await;

    mount_exhausted_listing(&server_a, &epoch_in(3600)).await;
    common::mount_list_pins(&server_b, vec![]).await;

    client_a.list_pins(&ListPinsQuery::default()).await.unwrap();
    let key_a = format!("GET:{}/pins", server_a.uri());
    assert_eq!(tracker.pending_waits(&key_a), 1);

    // A different service shares the tracker but not the bucket, so its
    // request goes out immediately.
    let listed = tokio::time::timeout(
        Duration::from_secs(10),
        client_b.list_pins(&ListPinsQuery::default()),
    )
    .await
    .expect("request to the other service must not wait on a foreign bucket");
    listed.unwrap();

    assert_eq!(tracker.pending_waits(&key_a), 1);
}

#[tokio::test]
async fn test_query_params_do_not_split_the_bucket() {
    let tracker = Arc::new(RateLimitTracker::new());
    let (server, client) = common::setup_with_tracker(Arc::clone(&tracker)).await;
    mount_exhausted_listing(&server, &epoch_in(3600)).await;

    let query = ListPinsQuery {
        limit: Some(10),
        ..Default::default()
    };
    client.list_pins(&query).await.unwrap();

    // The wait is queued under the stripped URL, without the query string
    assert_eq!(tracker.pending_waits(&format!("GET:{}/pins", server.uri())), 1);
}

#[tokio::test]
async fn test_deletions_share_one_bucket() {
    let tracker = Arc::new(RateLimitTracker::new());
    let (server, client) = common::setup_with_tracker(Arc::clone(&tracker)).await;

    Mock::given(method("DELETE"))
        .and(path_regex(r"^/pins/.+$"))
        .respond_with(
            ResponseTemplate::new(202)
                .append_header("x-ratelimit-remaining", "0")
                .append_header("x-ratelimit-reset", &epoch_in(3600)),
        )
        .mount(&server)
        .await;

    let id: RequestId = "req-a".parse().unwrap();
    client.remove_pin(&id).await.unwrap();

    // The request id segment is dropped from the key, so every deletion
    // lands in the same bucket.
    assert_eq!(tracker.pending_waits(&format!("DELETE:{}/pins", server.uri())), 1);
    assert_eq!(
        tracker.pending_waits(&format!("DELETE:{}/pins/req-a", server.uri())),
        0
    );
}
