//! Pincheck client - IPFS pinning service API client
//!
//! Provides an async client for the pinning service API:
//! - Typed operations for the five `/pins` endpoints
//! - Rate limit tracking driven by `x-ratelimit-*` response headers
//! - Response normalization into serializable call transcripts
//! - A hook pipeline for observing requests and responses
//!
//! ## Modules
//!
//! - [`client`] - The typed HTTP client
//! - [`detail`] - Request/response transcripts
//! - [`middleware`] - Pre/post request pipeline and hooks
//! - [`models`] - Wire models for the API
//! - [`rate_limit`] - Quota tracking and recovery waits

pub mod client;
pub mod detail;
pub mod middleware;
pub mod models;
pub mod rate_limit;

use thiserror::Error;

pub use client::PinningClient;
pub use detail::{CallDetail, RequestRecord, ResponseSnapshot};
pub use middleware::{CallHooks, Middleware, ResponseMeta};
pub use rate_limit::{rate_limit_key, RateLimitHeaders, RateLimitTracker};

/// Errors that can occur when communicating with a pinning service
#[derive(Debug, Error)]
pub enum ClientError {
    /// A network-level error occurred (connect, timeout, malformed request)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("Service returned HTTP {status}")]
    Api {
        /// The HTTP status code
        status: u16,
        /// Decoded error envelope, when the body carried one
        failure: Option<models::Failure>,
    },

    /// The request body could not be encoded
    #[error("Failed to encode request body: {0}")]
    Encode(String),

    /// The API response could not be parsed or was malformed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// The HTTP status carried by this error, when one is known.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The machine readable reason from the service's error envelope.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Api {
                failure: Some(failure),
                ..
            } => Some(&failure.error.reason),
            _ => None,
        }
    }
}
