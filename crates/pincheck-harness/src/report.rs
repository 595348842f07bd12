//! Run reports
//!
//! Serializable results of a compliance run, from a single expectation up
//! to the whole run. The CLI renders these either as human readable output
//! or as JSON.

use chrono::{DateTime, Utc};
use pincheck_client::CallDetail;
use serde::{Deserialize, Serialize};

// ============================================================================
// Expectation and call reports
// ============================================================================

/// Result of one registered expectation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectationReport {
    /// What the expectation asserts
    pub title: String,
    /// Whether the predicate held
    pub passed: bool,
    /// Why it failed, when it did
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ExpectationReport {
    /// A satisfied expectation
    #[must_use]
    pub fn passed(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            passed: true,
            reason: None,
        }
    }

    /// A violated expectation with the reason it failed
    #[must_use]
    pub fn failed(title: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            passed: false,
            reason: Some(reason.into()),
        }
    }
}

/// Result of evaluating every expectation registered on one API call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallReport {
    /// The call's display title
    pub title: String,
    /// Expectation results in registration order
    pub expectations: Vec<ExpectationReport>,
    /// Error that kept the call from completing, when one occurred
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Full transcript of the call, when one was captured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<CallDetail>,
}

impl CallReport {
    /// Whether the call counts as passed.
    ///
    /// A call passes when every evaluated expectation held. A call that
    /// failed outright with nothing registered against it fails on the
    /// error alone.
    #[must_use]
    pub fn passed(&self) -> bool {
        if self.expectations.is_empty() {
            self.error.is_none()
        } else {
            self.expectations.iter().all(|e| e.passed)
        }
    }
}

// ============================================================================
// Check and run reports
// ============================================================================

/// Every call report produced by one check against one service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Call reports in the order the check evaluated them
    pub calls: Vec<CallReport>,
}

impl CheckOutcome {
    /// An outcome with no calls yet
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a call report
    pub fn push(&mut self, report: CallReport) {
        self.calls.push(report);
    }

    /// Whether every call in the outcome passed
    #[must_use]
    pub fn passed(&self) -> bool {
        self.calls.iter().all(CallReport::passed)
    }
}

/// One check executed against one service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRun {
    /// Name of the check
    pub check: String,
    /// Display name of the service it ran against
    pub service: String,
    /// The outcome, when the check script completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<CheckOutcome>,
    /// Error raised by the check script itself, when it did not complete
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_error: Option<String>,
}

impl CheckRun {
    /// A run passes when its script completed and every call passed
    #[must_use]
    pub fn passed(&self) -> bool {
        self.script_error.is_none() && self.outcome.as_ref().is_some_and(CheckOutcome::passed)
    }
}

/// The complete result of a compliance run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the run finished
    pub finished_at: DateTime<Utc>,
    /// Every check/service combination that executed
    pub runs: Vec<CheckRun>,
}

impl RunSummary {
    /// Whether every run passed
    #[must_use]
    pub fn passed(&self) -> bool {
        self.runs.iter().all(CheckRun::passed)
    }

    /// Number of passed runs
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.runs.iter().filter(|r| r.passed()).count()
    }

    /// Number of failed runs
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.runs.len() - self.passed_count()
    }

    /// Drops the request/response transcripts from every call report.
    ///
    /// Transcripts carry full bodies and headers; reports shipped outside
    /// a debugging session usually leave them out.
    pub fn strip_detail(&mut self) {
        for run in &mut self.runs {
            if let Some(outcome) = &mut run.outcome {
                for call in &mut outcome.calls {
                    call.detail = None;
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
