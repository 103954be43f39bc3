//! Panel Server Entry Point
//!
//! Initializes logging, loads configuration, boots every registered panel
//! over the demo store and serves them over HTTP.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use filament_panel::core::{Config, HttpServer};
use filament_panel::domains::panels::{
    PanelRegistry, PanelRuntime, demo_store, demo_users, get_all_panel_providers,
};
use filament_panel::domains::resources::{NamingStrategy, get_all_policies};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from a file when given, else from the environment
    let config = match std::env::var("PANEL_CONFIG") {
        Ok(path) => Config::from_file(&path).with_context(|| format!("loading {path}"))?,
        Err(_) => Config::from_env(),
    };

    // Initialize logging
    init_logging(&config.logging.level, config.logging.with_timestamps);

    info!("Starting {} v{}", config.server.name, config.server.version);

    let registry = PanelRegistry::from_providers(&get_all_panel_providers())?;
    let naming = NamingStrategy::new().with_model_namespace(config.panel.model_namespace.clone());
    let gate = get_all_policies(&naming);
    let store = demo_store("sqlite");

    let runtime = PanelRuntime::boot(registry, Arc::new(gate), Arc::new(store), demo_users(), &config)?;

    info!("Panels initialized");

    HttpServer::new(config, runtime).run().await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Configures tracing with the specified log level and format.
fn init_logging(level: &str, with_timestamps: bool) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    if with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
