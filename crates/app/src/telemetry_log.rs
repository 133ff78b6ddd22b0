//! Append-only in-memory telemetry history.

use parking_lot::Mutex;

use domo_domain::id::DeviceId;
use domo_domain::telemetry::TelemetryRecord;

/// Process-lifetime sensor history.
///
/// Append-only and unbounded in principle; queries are served from the most
/// recent N matching entries, so readers never pay for the full history.
#[derive(Default)]
pub struct TelemetryLog {
    records: Mutex<Vec<TelemetryRecord>>,
}

impl TelemetryLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record.
    pub fn append(&self, record: TelemetryRecord) {
        self.records.lock().push(record);
    }

    /// The most recent `limit` records for a device, oldest first.
    #[must_use]
    pub fn recent_for(&self, device_id: &DeviceId, limit: usize) -> Vec<TelemetryRecord> {
        let records = self.records.lock();
        let matching: Vec<TelemetryRecord> = records
            .iter()
            .filter(|record| &record.device_id == device_id)
            .cloned()
            .collect();
        let skip = matching.len().saturating_sub(limit);
        matching.into_iter().skip(skip).collect()
    }

    /// Total records across all devices.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.lock().len()
    }
}
