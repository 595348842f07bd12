//! Request/response transcripts
//!
//! Every API call produces a [`CallDetail`]: a serializable record of what
//! was sent and what came back, built once per response. The response body
//! is read exactly once; the text and JSON views are derived independently
//! from that single byte buffer, and anything that cannot be decoded is
//! recorded in [`CallDetail::errors`] instead of failing the call.

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::{Request, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Header snapshots
// ============================================================================

fn snapshot_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut snapshot: BTreeMap<String, String> = BTreeMap::new();

    for (name, value) in headers {
        let value = if name == AUTHORIZATION {
            "<redacted>".to_string()
        } else {
            String::from_utf8_lossy(value.as_bytes()).into_owned()
        };

        // Repeated headers collapse into one comma separated entry
        snapshot
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    snapshot
}

// ============================================================================
// Request records
// ============================================================================

/// What was sent: method, URL, headers and body of an outgoing request
///
/// The authorization header is redacted so transcripts are safe to log and
/// embed in reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestRecord {
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl RequestRecord {
    /// Capture a built request before it is dispatched
    #[must_use]
    pub fn from_request(request: &Request) -> Self {
        let body = request
            .body()
            .and_then(reqwest::Body::as_bytes)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned());

        Self {
            method: request.method().to_string(),
            url: request.url().to_string(),
            headers: snapshot_headers(request.headers()),
            body,
        }
    }
}

// ============================================================================
// Response snapshots
// ============================================================================

/// What came back: status, headers and the decoded views of the body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSnapshot {
    pub url: String,
    pub status: u16,
    /// Whether the status code is in the 2xx range
    pub ok: bool,
    pub status_text: String,
    pub headers: BTreeMap<String, String>,
    /// Body decoded as UTF-8 text, when possible
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Body parsed as JSON, when possible
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<Value>,
}

// ============================================================================
// Call details
// ============================================================================

/// Complete transcript of one API call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallDetail {
    pub request: RequestRecord,
    pub response: ResponseSnapshot,
    /// Body decoding problems, in the order they were found
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl CallDetail {
    /// Consume a response and build its transcript
    ///
    /// Status, headers and URL are snapshotted before the body is touched,
    /// so they survive even when the body cannot be read. A response that
    /// declares `content-length: 0` yields no body views and no errors.
    pub async fn from_response(request: RequestRecord, response: Response) -> Self {
        let url = response.url().to_string();
        let status = response.status();
        let headers = snapshot_headers(response.headers());
        let has_content = response.content_length() != Some(0);

        let mut errors = Vec::new();
        let mut text = None;
        let mut json = None;

        if has_content {
            match response.bytes().await {
                Ok(bytes) => {
                    match std::str::from_utf8(&bytes) {
                        Ok(s) => text = Some(s.to_string()),
                        Err(e) => {
                            errors.push(format!("Failed to decode response body as UTF-8: {e}"));
                        }
                    }
                    match serde_json::from_slice::<Value>(&bytes) {
                        Ok(value) => json = Some(value),
                        Err(e) => {
                            errors.push(format!("Failed to parse response body as JSON: {e}"));
                        }
                    }
                }
                Err(e) => errors.push(format!("Failed to read response body: {e}")),
            }
        }

        Self {
            request,
            response: ResponseSnapshot {
                url,
                status: status.as_u16(),
                ok: status.is_success(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
                headers,
                text,
                json,
            },
            errors,
        }
    }

    /// Whether the response status is in the 2xx range
    #[must_use]
    pub fn ok(&self) -> bool {
        self.response.ok
    }

    /// The response status code
    #[must_use]
    pub fn status(&self) -> u16 {
        self.response.status
    }
}

// ============================================================================
// Tests
// ============================================================================
