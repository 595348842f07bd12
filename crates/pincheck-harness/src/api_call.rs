//! Lazily executed, memoized API calls
//!
//! An [`ApiCall`] wraps one client operation together with the expectations
//! a check registers against it. The underlying request is sent at most
//! once: the first use of the outcome executes it, concurrent first users
//! share the in-flight execution, and everything after that reads the
//! memoized result. Checks can therefore express dependencies between
//! calls naturally, reading one call's outcome while building the next.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use pincheck_client::{CallDetail, CallHooks, ClientError, PinningClient};
use pincheck_core::ServiceTokenPair;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::env::CheckEnv;
use crate::report::{CallReport, ExpectationReport};
use crate::schema::Schema;

// ============================================================================
// Transcript capture
// ============================================================================

/// Hook that stores the transcript of the most recent call on its client.
#[derive(Debug, Default)]
pub(crate) struct DetailCapture {
    detail: Mutex<Option<CallDetail>>,
}

impl DetailCapture {
    fn take(&self) -> Option<CallDetail> {
        self.detail.lock().unwrap().take()
    }
}

#[async_trait]
impl CallHooks for DetailCapture {
    async fn on_detail(&self, detail: &CallDetail) -> anyhow::Result<()> {
        *self.detail.lock().unwrap() = Some(detail.clone());
        Ok(())
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// What one executed call produced.
#[derive(Debug)]
pub struct CallOutcome<T> {
    /// Decoded success value, when the call succeeded
    pub result: Option<T>,
    /// The error, when it did not
    pub error: Option<ClientError>,
    /// Transcript of the request/response, when a response was received
    pub detail: Option<CallDetail>,
}

impl<T> CallOutcome<T> {
    /// Whether the call produced a decoded result.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.result.is_some()
    }

    /// HTTP status of the response, when one is known.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match &self.detail {
            Some(detail) => Some(detail.status()),
            None => self.error.as_ref().and_then(ClientError::status),
        }
    }

    /// Whether the response status was in the 2xx range.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.detail.as_ref().is_some_and(CallDetail::ok)
    }

    /// The JSON view of the response body.
    #[must_use]
    pub fn json(&self) -> Option<&Value> {
        self.detail.as_ref().and_then(|d| d.response.json.as_ref())
    }
}

// ============================================================================
// Expectations
// ============================================================================

type Predicate<T> = Box<dyn Fn(&CallOutcome<T>) -> anyhow::Result<bool> + Send + Sync>;

struct Expectation<T> {
    title: String,
    predicate: Predicate<T>,
}

// ============================================================================
// ApiCall
// ============================================================================

type CallFn<T> = Box<dyn Fn(PinningClient) -> BoxFuture<'static, Result<T, ClientError>> + Send + Sync>;

/// One client operation, its memoized outcome, and its expectations.
pub struct ApiCall<T> {
    title: String,
    client: PinningClient,
    capture: Arc<DetailCapture>,
    call: CallFn<T>,
    outcome: OnceCell<CallOutcome<T>>,
    schema: Option<Schema>,
    expectations: Vec<Expectation<T>>,
}

impl<T> fmt::Debug for ApiCall<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCall")
            .field("title", &self.title)
            .field("executed", &self.outcome.initialized())
            .field("expectations", &self.expectations.len())
            .finish()
    }
}

impl<T: Send + Sync + 'static> ApiCall<T> {
    /// Wraps a client operation for deferred execution.
    ///
    /// The client is built through the environment, so it shares the run's
    /// rate limit tracker and hooks. Nothing is sent until the outcome is
    /// first used.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be constructed
    pub fn new<F, Fut>(
        env: &CheckEnv,
        pair: &ServiceTokenPair,
        title: impl Into<String>,
        call: F,
    ) -> Result<Self, ClientError>
    where
        F: Fn(PinningClient) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
    {
        let capture = Arc::new(DetailCapture::default());
        let client = env.build_client(pair, Arc::clone(&capture))?;

        Ok(Self {
            title: title.into(),
            client,
            capture,
            call: Box::new(move |client| call(client).boxed()),
            outcome: OnceCell::new(),
            schema: None,
            expectations: Vec::new(),
        })
    }

    /// Attaches a response body schema.
    ///
    /// The schema acts as an implicit first expectation: when the
    /// expectations run, the JSON body is validated against it before any
    /// registered predicate is evaluated.
    #[must_use]
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// The call's display title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Registers an expectation on the call's outcome.
    ///
    /// Predicates return `Ok(true)` to pass, `Ok(false)` to fail, or an
    /// error; an error is recorded as the failure reason and never
    /// propagates out of the evaluation.
    pub fn expect<P>(&mut self, title: impl Into<String>, predicate: P)
    where
        P: Fn(&CallOutcome<T>) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        self.expectations.push(Expectation {
            title: title.into(),
            predicate: Box::new(predicate),
        });
    }

    /// Executes the call on first use and returns the memoized outcome.
    ///
    /// Concurrent first users share one in-flight execution; everyone else
    /// reads the stored outcome without another request going out.
    pub async fn outcome(&self) -> &CallOutcome<T> {
        self.outcome
            .get_or_init(|| async {
                debug!(call = %self.title, "Executing API call");
                let result = (self.call)(self.client.clone()).await;
                let detail = self.capture.take();

                match result {
                    Ok(value) => CallOutcome {
                        result: Some(value),
                        error: None,
                        detail,
                    },
                    Err(e) => CallOutcome {
                        result: None,
                        error: Some(e),
                        detail,
                    },
                }
            })
            .await
    }

    /// The decoded success value, executing the call if needed.
    pub async fn result(&self) -> Option<&T> {
        self.outcome().await.result.as_ref()
    }

    /// Executes the call if needed and evaluates every expectation in
    /// registration order.
    ///
    /// Evaluation never short-circuits: a failing or erroring predicate is
    /// recorded and the remaining expectations still run. An attached
    /// schema is evaluated first, as an implicit expectation on the
    /// response body.
    pub async fn run_expectations(&self) -> CallReport {
        let outcome = self.outcome().await;
        let mut reports = Vec::new();

        if let Some(schema) = &self.schema {
            let title = format!("response body matches {} schema", schema.name());
            let report = match outcome.json() {
                Some(body) => match schema.check(body) {
                    Ok(()) => ExpectationReport::passed(title),
                    Err(reason) => ExpectationReport::failed(title, reason),
                },
                None => ExpectationReport::failed(title, "no JSON body to validate"),
            };
            reports.push(report);
        }

        for expectation in &self.expectations {
            let report = match (expectation.predicate)(outcome) {
                Ok(true) => ExpectationReport::passed(&expectation.title),
                Ok(false) => {
                    ExpectationReport::failed(&expectation.title, "predicate returned false")
                }
                Err(e) => ExpectationReport::failed(&expectation.title, e.to_string()),
            };
            reports.push(report);
        }

        CallReport {
            title: self.title.clone(),
            expectations: reports,
            error: outcome.error.as_ref().map(ToString::to_string),
            detail: outcome.detail.clone(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
