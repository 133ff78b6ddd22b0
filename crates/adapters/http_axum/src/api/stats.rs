//! System statistics endpoint.

use axum::Json;
use axum::extract::State;

use domo_domain::stats::DeviceStats;

use crate::state::AppState;

/// `GET /api/stats`
pub async fn get(State(state): State<AppState>) -> Json<DeviceStats> {
    Json(state.registry.stats())
}
