//! Check orchestration
//!
//! The runner executes every registered check against every configured
//! service and collects the results into a [`RunSummary`]. Check scripts
//! are isolated from each other: one blowing up is recorded as a failed
//! run and the rest still execute.

use chrono::Utc;
use pincheck_core::ServiceTokenPair;
use tracing::{error, info};

use crate::check::Check;
use crate::env::CheckEnv;
use crate::report::{CheckRun, RunSummary};

/// Runs a set of checks against a set of services.
#[derive(Default)]
pub struct CheckRunner {
    checks: Vec<Box<dyn Check>>,
}

impl CheckRunner {
    /// A runner with no checks registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a check.
    pub fn register(&mut self, check: Box<dyn Check>) {
        self.checks.push(check);
    }

    /// The registered checks, in registration order.
    #[must_use]
    pub fn checks(&self) -> &[Box<dyn Check>] {
        &self.checks
    }

    /// Executes every check against every service, sequentially.
    ///
    /// `services` pairs a display name with the endpoint/token pair the
    /// checks receive.
    pub async fn run(
        &self,
        env: &CheckEnv,
        services: &[(String, ServiceTokenPair)],
    ) -> RunSummary {
        let started_at = Utc::now();
        let mut runs = Vec::new();

        for (service, pair) in services {
            for check in &self.checks {
                info!(check = check.name(), service = %service, "Running check");

                let run = match check.run(env, pair).await {
                    Ok(outcome) => CheckRun {
                        check: check.name().to_string(),
                        service: service.clone(),
                        outcome: Some(outcome),
                        script_error: None,
                    },
                    Err(e) => {
                        let message = format!("{e:#}");
                        error!(
                            check = check.name(),
                            service = %service,
                            error = %message,
                            "Check script failed"
                        );
                        CheckRun {
                            check: check.name().to_string(),
                            service: service.clone(),
                            outcome: None,
                            script_error: Some(message),
                        }
                    }
                };
                runs.push(run);
            }
        }

        RunSummary {
            started_at,
            finished_at: Utc::now(),
            runs,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
