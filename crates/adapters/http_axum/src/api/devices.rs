//! JSON REST handlers for devices.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use domo_domain::device::{Device, DeviceType};
use domo_domain::error::NotFoundError;
use domo_domain::id::DeviceId;
use domo_domain::patch::DevicePatch;

use crate::error::ApiError;
use crate::state::AppState;

/// Optional filters for the device listing. A room filter takes precedence
/// over a type filter when both are supplied.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Room (first identifier segment) or the `all` sentinel.
    pub room: Option<String>,
    /// Device kind tag.
    pub device_type: Option<DeviceType>,
}

/// `GET /api/devices`
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Device>> {
    let devices = if let Some(room) = query.room {
        state.registry.by_room(&room)
    } else if let Some(device_type) = query.device_type {
        state.registry.by_type(device_type)
    } else {
        state.registry.all()
    };
    Json(devices)
}

/// `GET /api/devices/{*id}`
pub async fn get(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<Device>, ApiError> {
    let id = DeviceId::parse(&raw)?;
    let device = state.registry.get(&id).ok_or_else(|| NotFoundError {
        entity: "Device",
        id: id.to_string(),
    })?;
    Ok(Json(device))
}

/// `PATCH /api/devices/{*id}`
pub async fn update(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    Json(patch): Json<DevicePatch>,
) -> Result<Json<Device>, ApiError> {
    let id = DeviceId::parse(&raw)?;
    let device = state.registry.apply_patch(&id, &patch)?;
    Ok(Json(device))
}
