//! Run command - execute the compliance checks
//!
//! Provides the `pincheck run` CLI command which:
//! 1. Loads the service list from configuration or from --endpoint/--token
//! 2. Registers the shipped checks, optionally narrowed with --only
//! 3. Runs every check against every service through one shared environment
//! 4. Renders a human readable or JSON summary and sets the exit code

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use pincheck_checks::all_checks;
use pincheck_core::{AccessToken, Config, ServiceEndpoint, ServiceTokenPair};
use pincheck_harness::{Check, CheckEnv, CheckRunner, RunSummary};
use tracing::info;

use crate::output::{get_formatter, OutputFormat, OutputFormatter};

/// Run the compliance checks
#[derive(Debug, Args)]
pub struct RunCommand {
    /// Check a single service at this endpoint instead of the configured ones
    #[arg(long, requires = "token")]
    pub endpoint: Option<String>,

    /// Bearer token for the --endpoint service
    #[arg(long, requires = "endpoint")]
    pub token: Option<String>,

    /// Run only the named checks (can be repeated)
    #[arg(long, value_name = "CHECK")]
    pub only: Vec<String>,

    /// Keep full request/response transcripts in the JSON report
    #[arg(long)]
    pub include_detail: bool,
}

impl RunCommand {
    /// Execute the run command
    pub async fn execute(&self, config_path: Option<&str>, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);

        let config = load_config(config_path)?;
        let services = self.resolve_services(&config)?;
        if services.is_empty() {
            formatter.warn("No services to check");
            formatter.info("Add services to the config file or pass --endpoint and --token.");
            return Ok(());
        }

        let mut runner = CheckRunner::new();
        for check in self.selected_checks()? {
            runner.register(check);
        }

        info!(
            checks = runner.checks().len(),
            services = services.len(),
            "Starting compliance run"
        );

        let env = CheckEnv::new().with_http(config.http.clone());
        let mut summary = runner.run(&env, &services).await;

        if !self.include_detail && !config.report.include_detail {
            summary.strip_detail();
        }

        if format.is_json() {
            formatter.print_json(
                &serde_json::to_value(&summary).context("Failed to serialize run summary")?,
            );
        } else {
            render_human(&summary, &*formatter);
        }

        if !summary.passed() {
            std::process::exit(1);
        }
        Ok(())
    }

    /// The services this run targets: the flag pair when given, the
    /// configured entries otherwise.
    fn resolve_services(&self, config: &Config) -> Result<Vec<(String, ServiceTokenPair)>> {
        if let (Some(endpoint), Some(token)) = (&self.endpoint, &self.token) {
            let endpoint = ServiceEndpoint::parse(endpoint).context("Invalid --endpoint")?;
            let token = AccessToken::new(token.clone()).context("Invalid --token")?;
            let name = endpoint.as_str().to_string();
            return Ok(vec![(name, ServiceTokenPair::new(endpoint, token))]);
        }

        Ok(config
            .services
            .iter()
            .map(|entry| (entry.display_name().to_string(), entry.token_pair()))
            .collect())
    }

    fn selected_checks(&self) -> Result<Vec<Box<dyn Check>>> {
        let mut checks = all_checks();
        if self.only.is_empty() {
            return Ok(checks);
        }

        let available: Vec<&str> = checks.iter().map(|c| c.name()).collect();
        for name in &self.only {
            if !available.contains(&name.as_str()) {
                anyhow::bail!(
                    "Unknown check '{}'. Available checks: {}",
                    name,
                    available.join(", ")
                );
            }
        }

        checks.retain(|check| self.only.iter().any(|name| name == check.name()));
        Ok(checks)
    }
}

fn load_config(path: Option<&str>) -> Result<Config> {
    match path {
        Some(path) => Config::load(Path::new(path)),
        None => {
            let path = Config::default_path()?;
            Config::load_or_default(&path)
        }
    }
}

fn render_human(summary: &RunSummary, formatter: &dyn OutputFormatter) {
    for run in &summary.runs {
        let headline = format!("{} against {}", run.check, run.service);
        if run.passed() {
            formatter.success(&headline);
        } else {
            formatter.failure(&headline);
        }

        if let Some(error) = &run.script_error {
            formatter.info(&format!("check could not run: {error}"));
            continue;
        }

        let Some(outcome) = &run.outcome else { continue };
        for call in &outcome.calls {
            for expectation in &call.expectations {
                if expectation.passed {
                    formatter.info(&format!("\u{2713} {}", expectation.title));
                } else {
                    let reason = expectation.reason.as_deref().unwrap_or("failed");
                    formatter.info(&format!("\u{2717} {} ({reason})", expectation.title));
                }
            }
            if call.expectations.is_empty() {
                if let Some(error) = &call.error {
                    formatter.info(&format!("\u{2717} {} ({error})", call.title));
                }
            }
        }
    }

    formatter.info("");
    let passed = summary.passed_count();
    let total = summary.runs.len();
    if summary.passed() {
        formatter.success(&format!("{passed}/{total} check runs passed"));
    } else {
        formatter.failure(&format!(
            "{passed}/{total} check runs passed, {} failed",
            summary.failed_count()
        ));
    }
}
