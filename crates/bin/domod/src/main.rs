//! # domod — domo daemon
//!
//! Composition root that wires the registry, telemetry log, simulation
//! driver, and HTTP adapter together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (optional `domo.toml`, env-var overrides)
//! - Initialize tracing
//! - Seed the registry and start the simulation driver
//! - Build the axum router, bind, and serve
//! - Handle graceful shutdown (ctrl-c/SIGTERM): stop the driver at its
//!   next suspension point, let in-flight requests complete
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates. It is the
//! wiring layer — no domain logic belongs here.

mod config;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use domo_adapter_http_axum::state::AppState;
use domo_app::registry::DeviceRegistry;
use domo_app::seed;
use domo_app::simulation::{ReadingFeed, SimulationDriver};
use domo_app::telemetry_log::TelemetryLog;
use domo_app::update_bus::UpdateBus;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Registry
    let registry = Arc::new(DeviceRegistry::new(UpdateBus::new(256)));
    let devices = seed::demo_devices().context("building the seed device set")?;
    let seeded = devices.len();
    registry.seed(devices);
    info!(devices = seeded, "registry seeded");

    let telemetry = Arc::new(TelemetryLog::new());

    // Simulation driver
    let feed = if config.simulation.enabled {
        ReadingFeed::load_or_empty(Path::new(&config.simulation.data_file))
    } else {
        ReadingFeed::empty()
    };
    let driver = SimulationDriver::new(
        Arc::clone(&registry),
        Arc::clone(&telemetry),
        feed,
        Duration::from_secs(config.simulation.tick_seconds),
    );
    driver.start();

    // HTTP
    let state = AppState::new(Arc::clone(&registry), Arc::clone(&telemetry));
    let app = domo_adapter_http_axum::router::build(state, &config.server.cors_origins);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    info!(addr = %bind_addr, "domod listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    driver.stop().await;
    info!("shutdown complete");
    Ok(())
}

/// Resolve on ctrl-c or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(%err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => tracing::warn!(%err, "failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    info!("shutdown signal received");
}
