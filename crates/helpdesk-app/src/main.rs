//! Helpdesk application binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Overlay environment variables and CLI flags
//! 3. Initialize tracing
//! 4. Build the conversation store, response generator and orchestrator
//! 5. Start the axum REST API server

mod cli;

use clap::Parser;

use helpdesk_api::routes;
use helpdesk_api::state::AppState;
use helpdesk_core::config::HelpdeskConfig;

use cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Configuration. Load errors are reported once tracing is up.
    let config_file = args.resolve_config_path();
    let loaded = HelpdeskConfig::load(&config_file);
    let (mut config, load_error) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (HelpdeskConfig::default(), Some(e)),
    };
    config.apply_env_overrides();

    // Tracing.
    let level = args.resolve_log_level(&config);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .init();

    match load_error {
        None => tracing::info!(path = %config_file.display(), "Configuration loaded"),
        Some(e) => tracing::warn!(
            path = %config_file.display(),
            error = %e,
            "Failed to load config, using defaults"
        ),
    }

    args.apply_overrides(&mut config);
    tracing::info!(
        environment = %config.general.environment,
        debug = config.general.debug,
        "Starting helpdesk"
    );

    // Services.
    let state = AppState::from_config(config.clone());

    routes::start_server(&config, state).await?;
    Ok(())
}
