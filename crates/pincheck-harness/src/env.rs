//! Shared run environment
//!
//! A [`CheckEnv`] carries everything a check needs to talk to a service on
//! behalf of one compliance run: the rate limit tracker shared by every
//! client in the run, the hook set, the schema registry, and the HTTP
//! settings. The environment is handed to each check explicitly; nothing
//! in the harness is process-global.

use std::fmt;
use std::sync::Arc;

use pincheck_client::middleware::Middleware;
use pincheck_client::{CallHooks, ClientError, PinningClient, RateLimitTracker};
use pincheck_core::{HttpConfig, ServiceTokenPair};

use crate::api_call::DetailCapture;
use crate::schema::{Schema, SchemaRegistry};

/// Environment one compliance run executes in.
#[derive(Clone)]
pub struct CheckEnv {
    tracker: Arc<RateLimitTracker>,
    hooks: Vec<Arc<dyn CallHooks>>,
    schemas: SchemaRegistry,
    http: HttpConfig,
}

impl fmt::Debug for CheckEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckEnv")
            .field("hooks", &self.hooks.len())
            .field("schemas", &self.schemas.names())
            .field("http", &self.http)
            .finish()
    }
}

impl Default for CheckEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckEnv {
    /// Environment with a fresh tracker, the builtin schemas and default
    /// HTTP settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tracker: Arc::new(RateLimitTracker::new()),
            hooks: Vec::new(),
            schemas: SchemaRegistry::builtin(),
            http: HttpConfig::default(),
        }
    }

    /// Adds a hook that observes every call made during the run.
    #[must_use]
    pub fn with_hook(mut self, hook: Arc<dyn CallHooks>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Replaces the HTTP settings used for client construction.
    #[must_use]
    pub fn with_http(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    /// The tracker every client built from this environment gates on.
    #[must_use]
    pub fn tracker(&self) -> &Arc<RateLimitTracker> {
        &self.tracker
    }

    /// Looks up a response schema by name.
    #[must_use]
    pub fn schema(&self, name: &str) -> Option<Schema> {
        self.schemas.get(name).cloned()
    }

    /// Builds a client for the pair, wired to the shared tracker, the run
    /// hooks and the given transcript capture.
    pub(crate) fn build_client(
        &self,
        pair: &ServiceTokenPair,
        capture: Arc<DetailCapture>,
    ) -> Result<PinningClient, ClientError> {
        let mut middleware = Middleware::new(Arc::clone(&self.tracker));
        for hook in &self.hooks {
            middleware = middleware.with_hook(Arc::clone(hook));
        }
        middleware = middleware.with_hook(capture);

        Ok(PinningClient::with_http_config(pair, &self.http)?.with_middleware(middleware))
    }
}

// ============================================================================
// Tests
// ============================================================================
