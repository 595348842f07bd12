//! Pin lifecycle checks

use anyhow::bail;
use async_trait::async_trait;
use pincheck_client::models::Pin;
use pincheck_core::ServiceTokenPair;
use pincheck_harness::{ApiCall, Check, CheckEnv, CheckOutcome};
use tracing::debug;

use crate::util::inline_cid;

/// Pins fresh inline content and deletes the pin again by its request id.
///
/// The CID is generated per run, so the service cannot have seen it
/// before and the delete targets a pin this very check created. When the
/// creation response carries no pin, there is nothing to delete and the
/// script aborts instead of guessing at a request id.
#[derive(Debug, Default)]
pub struct DeleteNewPin;

#[async_trait]
impl Check for DeleteNewPin {
    fn name(&self) -> &'static str {
        "delete-new-pin"
    }

    fn summary(&self) -> &'static str {
        "A freshly created pin can be deleted by its request id"
    }

    async fn run(&self, env: &CheckEnv, pair: &ServiceTokenPair) -> anyhow::Result<CheckOutcome> {
        let pin = Pin::new(inline_cid()?);

        let mut create = ApiCall::new(
            env,
            pair,
            "Can create and then delete a new pin",
            move |client| {
                let pin = pin.clone();
                async move { client.add_pin(&pin).await }
            },
        )?;

        let created = create.result().await.cloned();
        create.expect("Pin was created", |outcome| Ok(outcome.succeeded()));
        create.expect("Creation response code is 200", |outcome| {
            Ok(outcome.status() == Some(200))
        });

        let Some(status) = created else {
            bail!("No pin in the creation response to delete");
        };
        debug!(requestid = %status.requestid, "Deleting the pin that was just created");

        let requestid = status.requestid;
        let delete = ApiCall::new(env, pair, "Can delete pin", move |client| {
            let requestid = requestid.clone();
            async move { client.remove_pin(&requestid).await }
        })?;

        let deleted = delete.outcome().await;
        let deleted_ok = deleted.ok();
        let deleted_status = deleted.status();

        create.expect("Pin was deleted", move |_| Ok(deleted_ok));
        create.expect("Pin deletion response code is 202", move |_| {
            Ok(deleted_status == Some(202))
        });

        let mut outcome = CheckOutcome::new();
        outcome.push(create.run_expectations().await);
        Ok(outcome)
    }
}
