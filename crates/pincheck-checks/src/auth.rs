//! Authentication checks

use anyhow::Context;
use async_trait::async_trait;
use pincheck_client::models::ListPinsQuery;
use pincheck_core::{AccessToken, ServiceTokenPair};
use pincheck_harness::{ApiCall, Check, CheckEnv, CheckOutcome};

/// Verifies the service rejects a deliberately wrong bearer token.
///
/// The pair's endpoint is kept and its token replaced, then a plain
/// listing request is sent. A compliant service answers 403 with a
/// Failure body rather than serving the request.
#[derive(Debug, Default)]
pub struct InvalidBearerToken;

#[async_trait]
impl Check for InvalidBearerToken {
    fn name(&self) -> &'static str {
        "invalid-bearer-token"
    }

    fn summary(&self) -> &'static str {
        "Requests carrying an invalid bearer token are rejected with a 403"
    }

    async fn run(&self, env: &CheckEnv, pair: &ServiceTokenPair) -> anyhow::Result<CheckOutcome> {
        let schema = env
            .schema("Failure")
            .context("Failure schema is not registered")?;
        let broken = pair.with_token(AccessToken::new("purposefullyInvalid".to_string())?);

        let mut call = ApiCall::new(env, &broken, "Request with invalid token", |client| {
            async move { client.list_pins(&ListPinsQuery::default()).await }
        })?
        .with_schema(schema);

        call.expect("Returns a 403", |outcome| Ok(outcome.status() == Some(403)));

        let mut outcome = CheckOutcome::new();
        outcome.push(call.run_expectations().await);
        Ok(outcome)
    }
}
