//! Billed CLI
//!
//! Lists an employee's bills and submits new ones against a Billed API.

mod commands;
mod config;

use std::path::PathBuf;
use std::sync::Arc;

use billed_client::BilledClient;
use billed_store::Store;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{BilledConfig, DEFAULT_ENDPOINT};

/// Billed CLI: manage expense reports from the terminal.
#[derive(Parser, Debug)]
#[command(name = "billed", version, about)]
struct Cli {
    /// Billed API endpoint URL. Overrides `[store].endpoint`.
    #[arg(long, env = "BILLED_ENDPOINT", global = true)]
    endpoint: Option<String>,

    /// Bearer token. Overrides `[store].jwt`.
    #[arg(long, env = "BILLED_JWT", global = true)]
    jwt: Option<String>,

    /// Email of the signed-in employee.
    #[arg(long, env = "BILLED_EMAIL", global = true)]
    email: Option<String>,

    /// Path to the TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List bills, most recent first.
    List,
    /// Upload a receipt and submit a new bill.
    Submit(commands::submit::SubmitArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = BilledConfig::discover(cli.config.as_deref())?;

    let endpoint = cli
        .endpoint
        .or_else(|| config.store.endpoint.clone())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned());
    let builder = BilledClient::builder(endpoint).timeout(config.store.timeout());
    let builder = match cli.jwt.or_else(|| config.store.jwt.clone()) {
        Some(jwt) => builder.jwt(jwt),
        None => builder,
    };
    let store: Arc<dyn Store> = Arc::new(builder.build()?);

    match cli.command {
        Command::List => commands::list::run(store, &cli.format).await,
        Command::Submit(args) => {
            commands::submit::run(
                store,
                cli.email.as_deref(),
                config.upload_policy(),
                &args,
                &cli.format,
            )
            .await
        }
    }
}
