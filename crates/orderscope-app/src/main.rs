//! orderscope - Orderly network analytics service - Entry Point

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Orderly network analytics service
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via ORDERSCOPE_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    orderscope_telemetry::init_logging()?;

    info!("Starting orderscope v{}", env!("CARGO_PKG_VERSION"));

    // Determine config path: CLI arg > ORDERSCOPE_CONFIG env var > default
    let config_path = args
        .config
        .or_else(|| std::env::var("ORDERSCOPE_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    info!(config_path = %config_path, "Loading configuration");

    let config = orderscope_app::AppConfig::load_or_default(&config_path)?;
    info!(
        api_base = %config.api_base_url,
        dashboard_port = config.dashboard.port,
        "Configuration loaded"
    );

    let app = orderscope_app::Application::new(config)?;
    app.run().await?;

    Ok(())
}
