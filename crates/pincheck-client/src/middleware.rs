//! Request/response middleware
//!
//! Couples the rate limit tracker to the request lifecycle and exposes
//! observation points for embedders:
//!
//! - Pre phase: [`CallHooks::before_request`] observers, then the rate
//!   limit gate blocks until the bucket's pending waits have drained
//! - Post phase: [`CallHooks::after_response`] observers, body
//!   normalization into a [`CallDetail`], quota header feedback to the
//!   tracker, then [`CallHooks::on_detail`] with the finished transcript
//!
//! Hooks observe, they never gate: a hook returning an error is logged and
//! the call proceeds.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Response;
use tracing::error;

use crate::detail::{CallDetail, RequestRecord};
use crate::rate_limit::RateLimitTracker;

// ============================================================================
// Hooks
// ============================================================================

/// Status line and headers of a response, available before the body is read.
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    pub url: String,
    pub status: u16,
    pub headers: HeaderMap,
}

impl ResponseMeta {
    #[must_use]
    pub fn from_response(response: &Response) -> Self {
        Self {
            url: response.url().to_string(),
            status: response.status().as_u16(),
            headers: response.headers().clone(),
        }
    }
}

/// Observation points around an API call.
///
/// All methods default to no-ops; implementors override the ones they care
/// about.
#[async_trait]
pub trait CallHooks: Send + Sync {
    /// Called with the built request before it is dispatched.
    async fn before_request(&self, record: &RequestRecord) -> Result<()> {
        let _ = record;
        Ok(())
    }

    /// Called with the status line and headers as soon as a response arrives.
    async fn after_response(&self, meta: &ResponseMeta) -> Result<()> {
        let _ = meta;
        Ok(())
    }

    /// Called with the finished transcript after normalization.
    async fn on_detail(&self, detail: &CallDetail) -> Result<()> {
        let _ = detail;
        Ok(())
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Pre and post request pipeline shared by every client call.
#[derive(Clone)]
pub struct Middleware {
    tracker: Arc<RateLimitTracker>,
    hooks: Vec<Arc<dyn CallHooks>>,
}

impl std::fmt::Debug for Middleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Middleware")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl Middleware {
    /// Creates a pipeline gating on the given tracker, with no hooks.
    #[must_use]
    pub fn new(tracker: Arc<RateLimitTracker>) -> Self {
        Self {
            tracker,
            hooks: Vec::new(),
        }
    }

    /// Adds an observer to the pipeline.
    #[must_use]
    pub fn with_hook(mut self, hook: Arc<dyn CallHooks>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// The tracker this pipeline gates on.
    #[must_use]
    pub fn tracker(&self) -> &Arc<RateLimitTracker> {
        &self.tracker
    }

    /// Pre-request phase: notify hooks, then block on the rate limit gate.
    pub async fn before_send(&self, record: &RequestRecord, key: &str) {
        for hook in &self.hooks {
            if let Err(e) = hook.before_request(record).await {
                error!(error = %e, "before_request hook failed");
            }
        }

        self.tracker.wait_for_quota(key).await;
    }

    /// Post-response phase: notify hooks, normalize the body, feed the quota
    /// headers back to the tracker and hand the transcript to observers.
    pub async fn after_receive(
        &self,
        record: RequestRecord,
        response: Response,
        key: &str,
    ) -> CallDetail {
        let meta = ResponseMeta::from_response(&response);
        for hook in &self.hooks {
            if let Err(e) = hook.after_response(&meta).await {
                error!(error = %e, "after_response hook failed");
            }
        }

        let detail = CallDetail::from_response(record, response).await;
        self.tracker.observe_headers(key, &meta.headers);

        for hook in &self.hooks {
            if let Err(e) = hook.on_detail(&detail).await {
                error!(error = %e, "on_detail hook failed");
            }
        }

        detail
    }
}

// ============================================================================
// Tests
// ============================================================================
