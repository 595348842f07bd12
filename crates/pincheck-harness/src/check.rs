//! The check contract

use async_trait::async_trait;
use pincheck_core::ServiceTokenPair;

use crate::env::CheckEnv;
use crate::report::CheckOutcome;

/// A single compliance check.
///
/// Checks are thin scripts: they build lazily executed API calls through
/// the environment, register expectations on them, and collect the
/// evaluated reports into an outcome. A check returning an error marks its
/// run as failed without tearing down the rest of the run.
#[async_trait]
pub trait Check: Send + Sync {
    /// Stable identifier, used for selection on the command line.
    fn name(&self) -> &'static str;

    /// One line description of what the check verifies.
    fn summary(&self) -> &'static str;

    /// Runs the check against one service.
    async fn run(&self, env: &CheckEnv, pair: &ServiceTokenPair) -> anyhow::Result<CheckOutcome>;
}
