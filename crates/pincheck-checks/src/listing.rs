//! Listing checks

use anyhow::Context;
use async_trait::async_trait;
use pincheck_client::models::ListPinsQuery;
use pincheck_core::ServiceTokenPair;
use pincheck_harness::{ApiCall, Check, CheckEnv, CheckOutcome};

/// Lists pin objects with default filters and sanity checks the page.
#[derive(Debug, Default)]
pub struct ListPins;

#[async_trait]
impl Check for ListPins {
    fn name(&self) -> &'static str {
        "list-pins"
    }

    fn summary(&self) -> &'static str {
        "Listing pin objects returns a well formed result page"
    }

    async fn run(&self, env: &CheckEnv, pair: &ServiceTokenPair) -> anyhow::Result<CheckOutcome> {
        let schema = env
            .schema("PinResults")
            .context("PinResults schema is not registered")?;

        let mut call = ApiCall::new(env, pair, "Can list pins", |client| {
            async move { client.list_pins(&ListPinsQuery::default()).await }
        })?
        .with_schema(schema);

        call.expect("Returns a 200", |outcome| Ok(outcome.status() == Some(200)));
        call.expect("Response carries a result page", |outcome| {
            Ok(outcome.succeeded())
        });
        call.expect("Count covers the returned results", |outcome| {
            Ok(outcome
                .result
                .as_ref()
                .is_some_and(|page| page.count >= page.results.len() as u64))
        });

        let mut outcome = CheckOutcome::new();
        outcome.push(call.run_expectations().await);
        Ok(outcome)
    }
}
