//! Domain error types
//!
//! This module defines error types for domain validation failures:
//! malformed identifiers, unusable tokens, and invalid service URLs.

use thiserror::Error;

/// Errors that can occur when constructing domain values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid content identifier format
    #[error("Invalid CID: {0}")]
    InvalidCid(String),

    /// Invalid pin request identifier
    #[error("Invalid request id: {0}")]
    InvalidRequestId(String),

    /// Invalid bearer token
    #[error("Invalid access token: {0}")]
    InvalidToken(String),

    /// Invalid pinning service endpoint URL
    #[error("Invalid service endpoint: {0}")]
    InvalidEndpoint(String),
}
