//! JSON REST API handler modules.

pub mod devices;
pub mod rooms;
pub mod stats;
pub mod telemetry;

use axum::Router;
use axum::routing::{get, post};

use crate::state::AppState;

/// Build the `/api` sub-router.
///
/// Device routes use a wildcard capture because identifiers contain
/// slashes (`living-room/thermostat/wall-01`).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/devices", get(devices::list))
        .route("/devices/{*id}", get(devices::get).patch(devices::update))
        .route("/stats", get(stats::get))
        .route("/rooms", get(rooms::list))
        .route("/telemetry", post(telemetry::ingest))
        .route("/telemetry/{*id}", get(telemetry::history))
}
