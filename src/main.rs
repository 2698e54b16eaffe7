use anyhow::{Context, Result};
use clap::Parser;
use job_checker::cli::{handle_command, Cli};
use job_checker::core::ConfigManager;
use std::fs::OpenOptions;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILE: &str = "/tmp/job_checker.log";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging first
    let log_path = std::env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true) // Clear file on startup
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("job_checker=info,rocket=warn")),
        )
        .init();

    info!(
        "Environment: {}",
        job_checker::environment::EnvironmentConfig::get_environment()
    );

    // Load configuration using unified ConfigManager
    let config = ConfigManager::load()?;

    handle_command(cli, config).await
}
