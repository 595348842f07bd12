//! Wire models for the IPFS pinning service API
//!
//! Serde representations of the request and response bodies defined by the
//! pinning service specification: pin objects, their lifecycle status, list
//! results, and the error envelope. Field names follow the wire format
//! exactly (`requestid`, lowercase status values).

use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, SecondsFormat, Utc};
use pincheck_core::{Cid, RequestId};
use serde::{Deserialize, Serialize};

// ============================================================================
// Pin lifecycle
// ============================================================================

/// Lifecycle status of a pin request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Accepted but not yet being transferred
    Queued,
    /// Content transfer in progress
    Pinning,
    /// Content successfully pinned
    Pinned,
    /// The service could not pin the content
    Failed,
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Queued => "queued",
            Self::Pinning => "pinning",
            Self::Pinned => "pinned",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Text matching strategy for name filters in list requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMatchingStrategy {
    /// Full match, case sensitive
    #[default]
    Exact,
    /// Full match, case insensitive
    Iexact,
    /// Substring match, case sensitive
    Partial,
    /// Substring match, case insensitive
    Ipartial,
}

impl Display for TextMatchingStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Exact => "exact",
            Self::Iexact => "iexact",
            Self::Partial => "partial",
            Self::Ipartial => "ipartial",
        };
        write!(f, "{s}")
    }
}

// ============================================================================
// Pin objects
// ============================================================================

/// A pin request body: the content to pin and optional hints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    /// Content identifier to pin
    pub cid: Cid,

    /// Optional human readable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Optional list of multiaddrs the content can be fetched from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origins: Option<Vec<String>>,

    /// Optional arbitrary metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<HashMap<String, String>>,
}

impl Pin {
    /// Create a pin request for a CID with no optional hints
    #[must_use]
    pub fn new(cid: Cid) -> Self {
        Self {
            cid,
            name: None,
            origins: None,
            meta: None,
        }
    }

    /// Set a human readable name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Status of a pin request as reported by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinStatus {
    /// Service-assigned identifier for this pin request
    pub requestid: RequestId,

    /// Current lifecycle status
    pub status: Status,

    /// When the service received the request
    pub created: DateTime<Utc>,

    /// The pin object as the service stores it
    pub pin: Pin,

    /// Multiaddrs the service expects the content to be sent to
    #[serde(default)]
    pub delegates: Vec<String>,

    /// Optional service-specific information
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<HashMap<String, String>>,
}

/// Paginated pin listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinResults {
    /// Total number of pin objects matching the query
    pub count: u64,

    /// The current page of results
    pub results: Vec<PinStatus>,
}

// ============================================================================
// Error envelope
// ============================================================================

/// Error body returned by the service on non-success responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    /// The error payload
    pub error: FailureError,
}

/// Reason and optional details of a failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureError {
    /// Mandatory machine readable reason code
    pub reason: String,

    /// Optional human readable explanation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

// ============================================================================
// List query
// ============================================================================

/// Filters for listing pin objects
///
/// All fields are optional; [`ListPinsQuery::default`] lists everything the
/// service returns by default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListPinsQuery {
    /// Restrict to these CIDs
    pub cid: Vec<Cid>,

    /// Name filter
    pub name: Option<String>,

    /// How to interpret the name filter
    pub match_strategy: Option<TextMatchingStrategy>,

    /// Restrict to these statuses
    pub status: Vec<Status>,

    /// Only pins created before this time
    pub before: Option<DateTime<Utc>>,

    /// Only pins created after this time
    pub after: Option<DateTime<Utc>>,

    /// Maximum number of results per page
    pub limit: Option<u32>,
}

impl ListPinsQuery {
    /// Render the filters as URL query pairs in wire format
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if !self.cid.is_empty() {
            let joined = self
                .cid
                .iter()
                .map(Cid::as_str)
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("cid".to_string(), joined));
        }

        if let Some(name) = &self.name {
            pairs.push(("name".to_string(), name.clone()));
        }

        if let Some(strategy) = self.match_strategy {
            pairs.push(("match".to_string(), strategy.to_string()));
        }

        if !self.status.is_empty() {
            let joined = self
                .status
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("status".to_string(), joined));
        }

        if let Some(before) = self.before {
            pairs.push((
                "before".to_string(),
                before.to_rfc3339_opts(SecondsFormat::Secs, true),
            ));
        }

        if let Some(after) = self.after {
            pairs.push((
                "after".to_string(),
                after.to_rfc3339_opts(SecondsFormat::Secs, true),
            ));
        }

        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }

        pairs
    }
}

// ============================================================================
// Tests
// ============================================================================
