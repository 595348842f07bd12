//! Checks command - list the available compliance checks

use anyhow::Result;
use clap::Args;
use pincheck_checks::all_checks;

use crate::output::{get_formatter, OutputFormat};

/// List the available checks
#[derive(Debug, Args)]
pub struct ChecksCommand {}

impl ChecksCommand {
    /// Execute the checks command
    pub async fn execute(&self, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let checks = all_checks();

        if format.is_json() {
            let entries: Vec<serde_json::Value> = checks
                .iter()
                .map(|c| serde_json::json!({ "name": c.name(), "summary": c.summary() }))
                .collect();
            formatter.print_json(&serde_json::Value::Array(entries));
            return Ok(());
        }

        formatter.success(&format!("{} checks available", checks.len()));
        formatter.info("");
        for check in &checks {
            formatter.info(&format!("{:<22} {}", check.name(), check.summary()));
        }

        Ok(())
    }
}
