//! Telemetry records ingested from external sensors.

use serde::{Deserialize, Serialize};

use crate::id::DeviceId;
use crate::time::Timestamp;

/// One sensor reading attached to a device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// The device the reading belongs to.
    pub device_id: DeviceId,
    /// Sensor kind, e.g. `temperature` or `humidity`.
    pub sensor_type: String,
    /// Measured value.
    pub value: f64,
    /// Unit of the value, e.g. `celsius`.
    pub unit: String,
    /// When the reading was taken; defaults to ingestion time when omitted.
    #[serde(default = "crate::time::now")]
    pub timestamp: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_timestamp_to_now_when_omitted() {
        let before = crate::time::now();
        let record: TelemetryRecord = serde_json::from_str(
            r#"{
                "device_id": "living-room/thermostat/wall-01",
                "sensor_type": "temperature",
                "value": 21.5,
                "unit": "celsius"
            }"#,
        )
        .unwrap();
        assert!(record.timestamp >= before);
        assert_eq!(record.sensor_type, "temperature");
    }

    #[test]
    fn should_keep_explicit_timestamp() {
        let record: TelemetryRecord = serde_json::from_str(
            r#"{
                "device_id": "living-room/thermostat/wall-01",
                "sensor_type": "temperature",
                "value": 21.5,
                "unit": "celsius",
                "timestamp": "2026-01-01T12:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(record.timestamp.to_rfc3339(), "2026-01-01T12:00:00+00:00");
    }

    #[test]
    fn should_reject_malformed_device_id() {
        let result: Result<TelemetryRecord, _> = serde_json::from_str(
            r#"{"device_id": "nope", "sensor_type": "temperature", "value": 1.0, "unit": "celsius"}"#,
        );
        assert!(result.is_err());
    }
}
