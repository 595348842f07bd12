//! Domain newtypes with validation
//!
//! This module provides strongly-typed wrappers for the identifiers and
//! credentials a compliance run deals with. Each newtype ensures data
//! validity at construction time.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use super::errors::DomainError;

// ============================================================================
// Content identifiers
// ============================================================================

/// An IPFS content identifier in multibase text form
///
/// The value is treated as opaque beyond a structural sanity check: it must
/// be non-empty and contain only characters that can appear in a multibase
/// encoding (alphanumerics plus `-`, `_` and `=` padding).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cid(String);

impl Cid {
    /// Create a new Cid
    ///
    /// # Errors
    /// Returns error if the value is empty or contains characters that no
    /// multibase encoding produces
    pub fn new(cid: String) -> Result<Self, DomainError> {
        if cid.is_empty() {
            return Err(DomainError::InvalidCid("CID cannot be empty".to_string()));
        }

        if !cid
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '=')
        {
            return Err(DomainError::InvalidCid(format!(
                "CID contains invalid characters: {cid}"
            )));
        }

        Ok(Self(cid))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Cid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Cid {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for Cid {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Cid> for String {
    fn from(cid: Cid) -> Self {
        cid.0
    }
}

// ============================================================================
// Pin request identifiers
// ============================================================================

/// A pin request identifier assigned by the pinning service
///
/// The service chooses the format, so the value is opaque. We only require
/// that it is non-empty and printable (it travels in URL paths).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RequestId(String);

impl RequestId {
    /// Create a new RequestId
    ///
    /// # Errors
    /// Returns error if the id is empty or contains whitespace or control
    /// characters
    pub fn new(id: String) -> Result<Self, DomainError> {
        if id.is_empty() {
            return Err(DomainError::InvalidRequestId(
                "Request id cannot be empty".to_string(),
            ));
        }

        if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(DomainError::InvalidRequestId(format!(
                "Request id contains whitespace or control characters: {id}"
            )));
        }

        Ok(Self(id))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RequestId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for RequestId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RequestId> for String {
    fn from(id: RequestId) -> Self {
        id.0
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// A bearer token for a pinning service
///
/// The token is opaque. `Debug` redacts the value so tokens never leak into
/// logs or panic messages; use [`AccessToken::as_str`] where the real value
/// is needed (request construction, config serialization).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccessToken(String);

impl AccessToken {
    /// Create a new AccessToken
    ///
    /// # Errors
    /// Returns error if the token is empty or contains characters that
    /// cannot appear in an HTTP header value
    pub fn new(token: String) -> Result<Self, DomainError> {
        if token.is_empty() {
            return Err(DomainError::InvalidToken(
                "Access token cannot be empty".to_string(),
            ));
        }

        if !token.chars().all(|c| c.is_ascii_graphic()) {
            return Err(DomainError::InvalidToken(
                "Access token contains non-printable characters".to_string(),
            ));
        }

        Ok(Self(token))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken(<redacted>)")
    }
}

impl FromStr for AccessToken {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for AccessToken {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<AccessToken> for String {
    fn from(token: AccessToken) -> Self {
        token.0
    }
}

// ============================================================================
// Service endpoints
// ============================================================================

/// A validated pinning service base URL
///
/// The endpoint must be an absolute `http` or `https` URL with a host and
/// without query or fragment parts. API paths are appended to it when
/// requests are built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceEndpoint(Url);

impl ServiceEndpoint {
    /// Create a new ServiceEndpoint from an already parsed URL
    ///
    /// # Errors
    /// Returns error if the URL is not plain http(s) or carries query or
    /// fragment parts
    pub fn new(url: Url) -> Result<Self, DomainError> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(DomainError::InvalidEndpoint(format!(
                "Endpoint must use http or https: {url}"
            )));
        }

        if url.host_str().is_none() {
            return Err(DomainError::InvalidEndpoint(format!(
                "Endpoint must have a host: {url}"
            )));
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(DomainError::InvalidEndpoint(format!(
                "Endpoint must not carry a query or fragment: {url}"
            )));
        }

        Ok(Self(url))
    }

    /// Parse and validate an endpoint from a string
    ///
    /// # Errors
    /// Returns error if the string is not a valid absolute URL
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let url = Url::parse(s)
            .map_err(|e| DomainError::InvalidEndpoint(format!("{s}: {e}")))?;
        Self::new(url)
    }

    /// Get the inner URL reference
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.0
    }

    /// Get the endpoint as a string
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Append an API path (e.g. `/pins`) to the endpoint
    ///
    /// The canonical URL form carries a trailing slash for bare authorities,
    /// which is trimmed here so paths never double up on separators.
    #[must_use]
    pub fn join_path(&self, path: &str) -> String {
        format!("{}{}", self.0.as_str().trim_end_matches('/'), path)
    }
}

impl Display for ServiceEndpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ServiceEndpoint {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ServiceEndpoint {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ServiceEndpoint> for String {
    fn from(endpoint: ServiceEndpoint) -> Self {
        endpoint.0.into()
    }
}

// ============================================================================
// Service/token pairs
// ============================================================================

/// The endpoint/credential unit a compliance run executes against
///
/// Checks receive a pair and build their clients from it. A pair can be
/// rewritten with a different token, which is how deliberately broken
/// credentials are produced for negative checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceTokenPair {
    endpoint: ServiceEndpoint,
    token: AccessToken,
}

impl ServiceTokenPair {
    /// Create a new pair
    #[must_use]
    pub fn new(endpoint: ServiceEndpoint, token: AccessToken) -> Self {
        Self { endpoint, token }
    }

    /// The service endpoint
    #[must_use]
    pub fn endpoint(&self) -> &ServiceEndpoint {
        &self.endpoint
    }

    /// The bearer token
    #[must_use]
    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    /// The same endpoint with a different token
    #[must_use]
    pub fn with_token(&self, token: AccessToken) -> Self {
        Self {
            endpoint: self.endpoint.clone(),
            token,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
