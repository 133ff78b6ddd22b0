//! Derived system statistics.

use serde::Serialize;

use crate::device::{Device, DeviceKind};

/// Aggregate dashboard summary derived from the registry contents.
///
/// Never stored — recomputed from the device snapshot on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceStats {
    /// `"{on}/{total} Active"` over light devices.
    pub lighting: String,
    /// `"{mean}°C Average"` over thermostat current temperatures, `0` when
    /// there are none.
    pub temperature: String,
    /// `"All Locked"` when every lock is engaged (vacuously true with no
    /// locks), otherwise `"Some Unlocked"`.
    pub security: String,
    /// Total registered devices.
    pub total_devices: usize,
    /// Devices currently reachable; simulated devices are always online.
    pub online_devices: usize,
}

impl DeviceStats {
    /// Compute the summary for a device snapshot.
    #[must_use]
    pub fn derive(devices: &[Device]) -> Self {
        let mut lights_total: usize = 0;
        let mut lights_on: usize = 0;
        let mut temps: Vec<i32> = Vec::new();
        let mut all_locked = true;

        for device in devices {
            match &device.kind {
                DeviceKind::Light { .. } => {
                    lights_total += 1;
                    if device.is_on {
                        lights_on += 1;
                    }
                }
                DeviceKind::Thermostat { current_temp, .. } => temps.push(current_temp.value()),
                DeviceKind::Lock { is_locked } => {
                    if !is_locked {
                        all_locked = false;
                    }
                }
            }
        }

        Self {
            lighting: format!("{lights_on}/{lights_total} Active"),
            temperature: format!("{}\u{b0}C Average", mean_rounded(&temps)),
            security: if all_locked { "All Locked" } else { "Some Unlocked" }.to_string(),
            total_devices: devices.len(),
            online_devices: devices.len(),
        }
    }
}

// Temperatures are bounded to [-20, 50] so the cast cannot truncate.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn mean_rounded(temps: &[i32]) -> i32 {
    if temps.is_empty() {
        return 0;
    }
    let sum: i32 = temps.iter().sum();
    (f64::from(sum) / temps.len() as f64).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::DeviceId;

    fn id(raw: &str) -> DeviceId {
        DeviceId::parse(raw).unwrap()
    }

    #[test]
    fn should_count_active_lights() {
        let devices = vec![
            Device::light(id("kitchen/light/ceiling-01"), "A"),
            Device::light(id("kitchen/light/under-cabinet-01"), "B").off(),
            Device::light(id("bedroom/light/ceiling-01"), "C"),
        ];
        let stats = DeviceStats::derive(&devices);
        assert_eq!(stats.lighting, "2/3 Active");
        assert_eq!(stats.total_devices, 3);
        assert_eq!(stats.online_devices, 3);
    }

    #[test]
    fn should_round_thermostat_mean_to_nearest_integer() {
        let devices = vec![
            Device::thermostat(id("living-room/thermostat/wall-01"), "A"),
            Device::thermostat(id("bedroom/thermostat/wall-01"), "B")
                .with_current_temp(19)
                .unwrap(),
        ];
        // current temps 21 and 19 -> mean 20
        let stats = DeviceStats::derive(&devices);
        assert_eq!(stats.temperature, "20\u{b0}C Average");
    }

    #[test]
    fn should_report_zero_average_with_no_thermostats() {
        let stats = DeviceStats::derive(&[]);
        assert_eq!(stats.temperature, "0\u{b0}C Average");
    }

    #[test]
    fn should_report_all_locked_vacuously_with_no_locks() {
        let stats = DeviceStats::derive(&[Device::light(id("kitchen/light/ceiling-01"), "A")]);
        assert_eq!(stats.security, "All Locked");
    }

    #[test]
    fn should_report_some_unlocked_when_any_lock_is_open() {
        let mut unlocked = Device::lock(id("garage/lock/side-door-01"), "Side Door");
        unlocked.kind = DeviceKind::Lock { is_locked: false };
        let devices = vec![
            Device::lock(id("living-room/lock/front-door-01"), "Front Door"),
            unlocked,
        ];
        let stats = DeviceStats::derive(&devices);
        assert_eq!(stats.security, "Some Unlocked");
    }
}
