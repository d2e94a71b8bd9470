use anyhow::{Context, Result};
use clap::Parser;
use rmm_resources::cli::{self, Cli};
use rmm_resources::RmmApi;
use serde_json::Value;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays pipeable JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rmm=info,rmm_resources=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.load_config()?;
    debug!(
        base_url = ?config.api.base_url(),
        timeout_secs = config.http.timeout_secs,
        "Configuration loaded"
    );

    let api = RmmApi::from_config(&config)?;
    let output = cli::run(&api, cli.command).await?;

    if let Value::Array(items) = &output {
        info!(count = items.len(), "Fetched records");
    }
    let rendered = serde_json::to_string_pretty(&output).context("Failed to render output")?;
    println!("{}", rendered);
    Ok(())
}
