//! # Leadscout API Main Entry Point
//!
//! This is the main entry point for the Leadscout API service.

use leadscout::{config::ConfigLoader, server::run_server, telemetry::init_tracing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from layered env files and variables
    let config_loader = ConfigLoader::new();
    let config = config_loader.load()?;

    init_tracing(&config)?;

    tracing::info!(profile = %config.profile, "Loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(configuration = %redacted_json, "Effective configuration");
    }

    // Start the server with the loaded configuration
    run_server(config).await
}
