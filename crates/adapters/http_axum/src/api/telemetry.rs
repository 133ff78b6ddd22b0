//! Telemetry ingestion and history queries.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use domo_domain::device::DeviceKind;
use domo_domain::error::NotFoundError;
use domo_domain::id::DeviceId;
use domo_domain::patch::DevicePatch;
use domo_domain::telemetry::TelemetryRecord;

use crate::error::ApiError;
use crate::state::AppState;

/// Acknowledgment for an accepted record.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    /// Always `success` for a 200.
    pub status: &'static str,
    /// Human-readable confirmation.
    pub message: &'static str,
}

/// `POST /api/telemetry`
///
/// Appends the record; a temperature reading for a thermostat additionally
/// flows through the same mutation-and-broadcast path as a client PATCH.
pub async fn ingest(
    State(state): State<AppState>,
    Json(record): Json<TelemetryRecord>,
) -> Result<Json<IngestResponse>, ApiError> {
    let device = state
        .registry
        .get(&record.device_id)
        .ok_or_else(|| NotFoundError {
            entity: "Device",
            id: record.device_id.to_string(),
        })?;

    state.telemetry.append(record.clone());

    if matches!(device.kind, DeviceKind::Thermostat { .. }) && record.sensor_type == "temperature" {
        #[allow(clippy::cast_possible_truncation)]
        let patch = DevicePatch {
            current_temp: Some(record.value.round() as i32),
            ..DevicePatch::default()
        };
        state.registry.apply_patch(&record.device_id, &patch)?;
    }

    tracing::info!(
        device = %record.device_id,
        sensor = %record.sensor_type,
        value = record.value,
        "telemetry ingested"
    );
    Ok(Json(IngestResponse {
        status: "success",
        message: "telemetry ingested",
    }))
}

/// Query parameters for the history endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Most recent records to return.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

const fn default_limit() -> usize {
    100
}

/// History response envelope.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// The queried device.
    pub device_id: DeviceId,
    /// Most recent records, oldest first.
    pub telemetry: Vec<TelemetryRecord>,
}

/// `GET /api/telemetry/{*id}`
pub async fn history(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let id = DeviceId::parse(&raw)?;
    state.registry.get(&id).ok_or_else(|| NotFoundError {
        entity: "Device",
        id: id.to_string(),
    })?;

    let telemetry = state.telemetry.recent_for(&id, query.limit);
    Ok(Json(HistoryResponse {
        device_id: id,
        telemetry,
    }))
}
