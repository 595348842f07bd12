//! pincheck CLI - Compliance checker for IPFS pinning service APIs
//!
//! Provides commands for:
//! - Running the compliance checks against configured services
//! - Listing the available checks

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{checks::ChecksCommand, run::RunCommand};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "pincheck",
    version,
    about = "Compliance checker for IPFS pinning service APIs"
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the compliance checks against one or more services
    Run(RunCommand),
    /// List the available checks
    Checks(ChecksCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    match cli.command {
        Commands::Run(cmd) => cmd.execute(cli.config.as_deref(), format).await,
        Commands::Checks(cmd) => cmd.execute(format).await,
    }
}
