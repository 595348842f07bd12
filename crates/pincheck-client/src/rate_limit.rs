//! Rate limit tracking for pinning service endpoints
//!
//! Tracks the `x-ratelimit-*` headers pinning services attach to responses
//! and delays follow-up requests until exhausted quotas recover.
//!
//! ## Architecture
//!
//! - [`rate_limit_key`]: derives the bucket key for a request
//! - [`RateLimitHeaders`]: best-effort parse of the advertised quota state
//! - [`RateLimitTracker`]: per-bucket queues of pending recovery waits
//!
//! Before a request is sent, every wait queued for its bucket is taken in
//! one step and awaited as a batch. A response reporting an exhausted quota
//! (`x-ratelimit-remaining: 0`) queues a wait until the advertised reset
//! time, which the next request in the same bucket consumes. Waits queued
//! while a batch is draining belong to the request after it.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pincheck_client::rate_limit::RateLimitTracker;
//!
//! # async fn example(headers: reqwest::header::HeaderMap) {
//! let tracker = RateLimitTracker::new();
//! tracker.wait_for_quota("GET:https://pin.example.com/pins").await;
//! // ... send the request ...
//! tracker.observe_headers("GET:https://pin.example.com/pins", &headers);
//! # }
//! ```

use std::{collections::HashMap, sync::Mutex, time::Duration};

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use reqwest::header::HeaderMap;
use reqwest::Method;
use tokio::time::{sleep_until, Instant};
use tracing::debug;
use url::Url;

// ============================================================================
// Bucket keys
// ============================================================================

/// Derives the rate limit bucket key for a request.
///
/// The key is the request method plus the URL with query and fragment parts
/// stripped, so listings with different filters share one bucket. DELETE
/// requests additionally drop the trailing path segment: deleting individual
/// pins counts against one shared deletion bucket instead of one bucket per
/// request id.
#[must_use]
pub fn rate_limit_key(method: &Method, url: &Url) -> String {
    let mut stripped = url.clone();
    stripped.set_query(None);
    stripped.set_fragment(None);

    let mut target = stripped.to_string();
    if *method == Method::DELETE {
        if let Some(idx) = target.rfind('/') {
            target.truncate(idx);
        }
    }

    format!("{method}:{target}")
}

// ============================================================================
// Header parsing
// ============================================================================

/// Quota state advertised by a response.
///
/// Parsing is best effort: absent or malformed headers become `None` and
/// never fail the request they arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RateLimitHeaders {
    /// Total quota of the current window (`x-ratelimit-limit`)
    pub limit: Option<u64>,
    /// Requests left in the current window (`x-ratelimit-remaining`)
    pub remaining: Option<u64>,
    /// Unix timestamp in seconds when the window resets (`x-ratelimit-reset`)
    pub reset: Option<u64>,
}

impl RateLimitHeaders {
    /// Parse the quota headers out of a response header map.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            limit: parse_u64_header(headers, "x-ratelimit-limit"),
            remaining: parse_u64_header(headers, "x-ratelimit-remaining"),
            reset: parse_u64_header(headers, "x-ratelimit-reset"),
        }
    }
}

fn parse_u64_header(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

/// How long until the advertised reset timestamp, clamped at zero.
fn reset_delay(reset_epoch_secs: u64) -> Duration {
    let Ok(secs) = i64::try_from(reset_epoch_secs) else {
        return Duration::ZERO;
    };
    match DateTime::<Utc>::from_timestamp(secs, 0) {
        Some(reset_at) => (reset_at - Utc::now()).to_std().unwrap_or(Duration::ZERO),
        None => Duration::ZERO,
    }
}

// ============================================================================
// Tracker
// ============================================================================

/// Process-wide registry of pending rate limit recovery waits.
///
/// One tracker is shared by every client taking part in a compliance run, so
/// checks running in parallel against the same service honor each other's
/// quota observations. Thread safety is provided by an internal mutex that
/// is never held across an await point.
#[derive(Debug, Default)]
pub struct RateLimitTracker {
    /// Pending recovery deadlines per bucket key
    pending: Mutex<HashMap<String, Vec<Instant>>>,
}

impl RateLimitTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes every wait queued for the bucket and sleeps until all of them
    /// have passed.
    ///
    /// The queue is emptied in one atomic step before any sleeping starts,
    /// so waits queued while this batch drains are left for the next caller.
    /// Buckets with no pending waits return immediately.
    pub async fn wait_for_quota(&self, key: &str) {
        let waits = {
            let mut pending = self.pending.lock().unwrap();
            match pending.get_mut(key) {
                Some(waits) => std::mem::take(waits),
                None => Vec::new(),
            }
        };

        if waits.is_empty() {
            return;
        }

        debug!(key, count = waits.len(), "Waiting for rate limit quota to recover");
        join_all(waits.into_iter().map(sleep_until)).await;
    }

    /// Records the quota headers of a response.
    ///
    /// Both `x-ratelimit-remaining` and `x-ratelimit-reset` must be present
    /// and numeric for the response to count; anything else is ignored. When
    /// the remaining quota is zero, a wait until the reset time is queued
    /// for the next request in the bucket. Reset times already in the past
    /// queue a wait that resolves immediately.
    pub fn observe_headers(&self, key: &str, headers: &HeaderMap) {
        let parsed = RateLimitHeaders::from_headers(headers);
        let (Some(remaining), Some(reset)) = (parsed.remaining, parsed.reset) else {
            return;
        };

        if remaining > 0 {
            return;
        }

        let delay = reset_delay(reset);
        debug!(
            key,
            reset,
            delay_ms = delay.as_millis(),
            "Rate limit exhausted, delaying next request until reset"
        );

        let deadline = Instant::now() + delay;
        let mut pending = self.pending.lock().unwrap();
        pending.entry(key.to_string()).or_default().push(deadline);
    }

    /// Number of waits currently queued for a bucket.
    #[must_use]
    pub fn pending_waits(&self, key: &str) -> usize {
        let pending = self.pending.lock().unwrap();
        pending.get(key).map_or(0, Vec::len)
    }
}

// ============================================================================
// Tests
// ============================================================================
