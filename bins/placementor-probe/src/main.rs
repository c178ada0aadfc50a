mod checks;
mod client;
mod fixtures;
mod runner;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use placementor_common::config::ProbeConfig;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "placementor-probe")]
#[command(about = "Black-box contract verifier for the PlaceMentor backend API", long_about = None)]
struct Cli {
    /// Base URL of the target service (overrides config file and env)
    #[arg(long)]
    base_url: Option<String>,

    /// Path to a probe config file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit the full run as JSON after the summary
    #[arg(long, default_value = "false")]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut config = match ProbeConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load probe configuration: {e:#}");
            std::process::exit(1);
        }
    };
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    info!("Target: {}", config.base_url);
    info!(
        "Expected order: {} {} (key {})",
        config.expected_amount, config.expected_currency, config.razorpay_key_id
    );
    if config.razorpay_key_secret.is_none() {
        info!("RAZORPAY_KEY_SECRET not set; payment verification will be skipped");
    }

    let client = client::ApiClient::new(&config.base_url)?;
    let run = runner::run_suite(&config, &client).await;
    runner::print_summary(&run);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&run)?);
    }

    if !run.all_passed() {
        std::process::exit(1);
    }
    Ok(())
}
