//! Shared application state for axum handlers.

use std::sync::Arc;

use domo_app::registry::DeviceRegistry;
use domo_app::telemetry_log::TelemetryLog;

/// Application state shared across all axum handlers.
///
/// Constructed once at startup and cloned into each handler. Nothing here
/// is process-global; tests build isolated instances.
#[derive(Clone)]
pub struct AppState {
    /// Canonical device registry (owns the update bus).
    pub registry: Arc<DeviceRegistry>,
    /// In-memory telemetry history.
    pub telemetry: Arc<TelemetryLog>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(registry: Arc<DeviceRegistry>, telemetry: Arc<TelemetryLog>) -> Self {
        Self {
            registry,
            telemetry,
        }
    }
}
