//! Pinning service API client
//!
//! Provides a typed HTTP client for the IPFS pinning service API. Handles
//! authentication headers, endpoint construction, and JSON deserialization,
//! and routes every call through the [`Middleware`] pipeline so transcripts
//! and rate limit bookkeeping happen uniformly.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pincheck_client::client::PinningClient;
//! use pincheck_client::models::ListPinsQuery;
//! use pincheck_core::ServiceTokenPair;
//!
//! # async fn example(pair: &ServiceTokenPair) -> anyhow::Result<()> {
//! let client = PinningClient::new(pair);
//! let pins = client.list_pins(&ListPinsQuery::default()).await?;
//! println!("service holds {} pins", pins.count);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use pincheck_core::{AccessToken, HttpConfig, RequestId, ServiceTokenPair};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::detail::{CallDetail, RequestRecord};
use crate::middleware::Middleware;
use crate::models::{Failure, ListPinsQuery, Pin, PinResults, PinStatus};
use crate::rate_limit::{rate_limit_key, RateLimitTracker};
use crate::ClientError;

// ============================================================================
// Helpers
// ============================================================================

fn parse_failure(detail: &CallDetail) -> Option<Failure> {
    detail
        .response
        .json
        .clone()
        .and_then(|v| serde_json::from_value(v).ok())
}

fn parse_body<T: DeserializeOwned>(detail: &CallDetail) -> Result<T, ClientError> {
    if !detail.ok() {
        return Err(ClientError::Api {
            status: detail.status(),
            failure: parse_failure(detail),
        });
    }

    let Some(json) = detail.response.json.clone() else {
        return Err(ClientError::InvalidResponse(format!(
            "Expected a JSON body from {}",
            detail.response.url
        )));
    };

    serde_json::from_value(json).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}

// ============================================================================
// PinningClient
// ============================================================================

/// HTTP client for one pinning service.
///
/// Wraps `reqwest::Client` with bearer authentication and base URL
/// construction. Every call flows through the shared [`Middleware`]: the
/// rate limit gate runs before the request goes out, and the response is
/// normalized into a [`CallDetail`] before the typed result is produced.
///
/// Cloning is cheap and clones share the middleware, so a check can hand
/// copies to concurrent calls.
#[derive(Debug, Clone)]
pub struct PinningClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL with any trailing slash trimmed
    base_url: String,
    /// Bearer token for the service
    token: AccessToken,
    /// Pre/post request pipeline
    middleware: Middleware,
}

impl PinningClient {
    /// Creates a client for the given service with default HTTP settings
    /// and a private rate limit tracker.
    ///
    /// Compliance runs normally build clients through the harness instead,
    /// which shares one tracker across every client in the run.
    #[must_use]
    pub fn new(pair: &ServiceTokenPair) -> Self {
        Self {
            client: Client::new(),
            base_url: pair.endpoint().as_str().trim_end_matches('/').to_string(),
            token: pair.token().clone(),
            middleware: Middleware::new(Arc::new(RateLimitTracker::new())),
        }
    }

    /// Creates a client with tuned HTTP settings (timeout, user agent).
    ///
    /// # Errors
    /// Returns error if the underlying HTTP client cannot be constructed
    pub fn with_http_config(pair: &ServiceTokenPair, http: &HttpConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(http.timeout_secs))
            .user_agent(http.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: pair.endpoint().as_str().trim_end_matches('/').to_string(),
            token: pair.token().clone(),
            middleware: Middleware::new(Arc::new(RateLimitTracker::new())),
        })
    }

    /// Replaces the middleware pipeline.
    ///
    /// This is how a run injects its shared rate limit tracker and
    /// transcript hooks.
    #[must_use]
    pub fn with_middleware(mut self, middleware: Middleware) -> Self {
        self.middleware = middleware;
        self
    }

    /// The base URL requests are built against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The rate limit tracker this client gates on.
    #[must_use]
    pub fn tracker(&self) -> &Arc<RateLimitTracker> {
        self.middleware.tracker()
    }

    /// Creates an authenticated request builder for the given method and path.
    ///
    /// Prepends the base URL and adds the Authorization header. Callers that
    /// need endpoints beyond the typed operations can use this directly, but
    /// requests built here bypass the middleware pipeline.
    #[must_use]
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, &url)
            .bearer_auth(self.token.as_str())
    }

    /// Builds, gates, sends and normalizes one API call.
    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<CallDetail, ClientError> {
        let mut builder = self.request(method, path);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let request = builder.build()?;
        let key = rate_limit_key(request.method(), request.url());
        let record = RequestRecord::from_request(&request);

        debug!(method = %record.method, url = %record.url, "Dispatching API call");
        self.middleware.before_send(&record, &key).await;

        let response = self.client.execute(request).await?;
        let detail = self.middleware.after_receive(record, response, &key).await;

        debug!(
            status = detail.response.status,
            url = %detail.response.url,
            "API call completed"
        );
        Ok(detail)
    }

    // ========================================================================
    // Typed operations
    // ========================================================================

    /// Lists pin objects matching the query.
    ///
    /// `GET /pins`
    ///
    /// # Errors
    /// Returns error on transport failure, non-success status, or a body
    /// that does not decode as pin results
    pub async fn list_pins(&self, query: &ListPinsQuery) -> Result<PinResults, ClientError> {
        let detail = self
            .dispatch(Method::GET, "/pins", &query.to_query_pairs(), None)
            .await?;
        parse_body(&detail)
    }

    /// Registers a new pin request.
    ///
    /// `POST /pins`
    ///
    /// # Errors
    /// Returns error on transport failure, non-success status, or a body
    /// that does not decode as a pin status
    pub async fn add_pin(&self, pin: &Pin) -> Result<PinStatus, ClientError> {
        let body = serde_json::to_value(pin).map_err(|e| ClientError::Encode(e.to_string()))?;
        let detail = self.dispatch(Method::POST, "/pins", &[], Some(&body)).await?;
        parse_body(&detail)
    }

    /// Fetches the current status of a pin request.
    ///
    /// `GET /pins/{requestid}`
    ///
    /// # Errors
    /// Returns error on transport failure, non-success status, or a body
    /// that does not decode as a pin status
    pub async fn get_pin(&self, requestid: &RequestId) -> Result<PinStatus, ClientError> {
        let path = format!("/pins/{}", requestid.as_str());
        let detail = self.dispatch(Method::GET, &path, &[], None).await?;
        parse_body(&detail)
    }

    /// Replaces the pin object of an existing request.
    ///
    /// `POST /pins/{requestid}`
    ///
    /// # Errors
    /// Returns error on transport failure, non-success status, or a body
    /// that does not decode as a pin status
    pub async fn replace_pin(
        &self,
        requestid: &RequestId,
        pin: &Pin,
    ) -> Result<PinStatus, ClientError> {
        let body = serde_json::to_value(pin).map_err(|e| ClientError::Encode(e.to_string()))?;
        let path = format!("/pins/{}", requestid.as_str());
        let detail = self.dispatch(Method::POST, &path, &[], Some(&body)).await?;
        parse_body(&detail)
    }

    /// Removes a pin request.
    ///
    /// `DELETE /pins/{requestid}`. Services answer with an empty success
    /// body, so only the status is checked.
    ///
    /// # Errors
    /// Returns error on transport failure or non-success status
    pub async fn remove_pin(&self, requestid: &RequestId) -> Result<(), ClientError> {
        let path = format!("/pins/{}", requestid.as_str());
        let detail = self.dispatch(Method::DELETE, &path, &[], None).await?;

        if detail.ok() {
            Ok(())
        } else {
            Err(ClientError::Api {
                status: detail.status(),
                failure: parse_failure(&detail),
            })
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
