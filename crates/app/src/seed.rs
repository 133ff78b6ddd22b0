//! The built-in demo device set.

use domo_domain::device::Device;
use domo_domain::error::ValidationError;
use domo_domain::id::DeviceId;

/// The ten demo devices the service starts with: four rooms, seven lights,
/// two thermostats, and one lock.
///
/// # Errors
///
/// Propagates [`ValidationError`] from the constructors; with the literal
/// values below this cannot fail, but the caller decides how to surface a
/// broken seed rather than panicking here.
pub fn demo_devices() -> Result<Vec<Device>, ValidationError> {
    Ok(vec![
        Device::lock(
            DeviceId::parse("living-room/lock/front-door-01")?,
            "Front Door Lock",
        ),
        Device::light(
            DeviceId::parse("living-room/light/ceiling-01")?,
            "Living Room Light",
        ),
        Device::thermostat(
            DeviceId::parse("living-room/thermostat/wall-01")?,
            "Smart Thermostat",
        ),
        Device::light(
            DeviceId::parse("kitchen/light/ceiling-01")?,
            "Kitchen Ceiling Light",
        )
        .with_brightness(80)?
        .with_color_temp("warm-white")?,
        Device::light(
            DeviceId::parse("kitchen/light/under-cabinet-01")?,
            "Under-Cabinet Lights",
        )
        .with_brightness(45)?
        .with_color_temp("cool-white")?
        .off(),
        Device::light(
            DeviceId::parse("bedroom/light/ceiling-01")?,
            "Bedroom Main Light",
        )
        .with_brightness(30)?
        .with_color_temp("warm")?
        .off(),
        Device::light(DeviceId::parse("bedroom/light/bedside-01")?, "Bedside Lamp")
            .with_brightness(25)?
            .with_color_temp("warm")?,
        Device::thermostat(
            DeviceId::parse("bedroom/thermostat/wall-01")?,
            "Bedroom Thermostat",
        )
        .with_target_temp(20)?
        .with_current_temp(19)?,
        Device::light(
            DeviceId::parse("bathroom/light/vanity-01")?,
            "Bathroom Vanity Light",
        )
        .with_brightness(90)?
        .with_color_temp("cool")?,
        Device::light(DeviceId::parse("bathroom/light/shower-01")?, "Shower Light")
            .with_brightness(70)?
            .off(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use domo_domain::device::{DeviceKind, DeviceType};

    #[test]
    fn should_build_ten_devices_across_four_rooms() {
        let devices = demo_devices().unwrap();
        assert_eq!(devices.len(), 10);

        let mut rooms: Vec<&str> = devices.iter().map(|d| d.device_id.room()).collect();
        rooms.sort_unstable();
        rooms.dedup();
        assert_eq!(rooms, vec!["bathroom", "bedroom", "kitchen", "living-room"]);
    }

    #[test]
    fn should_have_unique_identifiers() {
        let devices = demo_devices().unwrap();
        let mut ids: Vec<&str> = devices.iter().map(|d| d.device_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), devices.len());
    }

    #[test]
    fn should_match_documented_kind_split() {
        let devices = demo_devices().unwrap();
        let count = |t: DeviceType| devices.iter().filter(|d| d.device_type() == t).count();
        assert_eq!(count(DeviceType::Light), 7);
        assert_eq!(count(DeviceType::Thermostat), 2);
        assert_eq!(count(DeviceType::Lock), 1);
    }

    #[test]
    fn should_start_with_four_lights_on() {
        let devices = demo_devices().unwrap();
        let lights_on = devices
            .iter()
            .filter(|d| d.device_type() == DeviceType::Light && d.is_on)
            .count();
        assert_eq!(lights_on, 4);
    }

    #[test]
    fn should_configure_the_bedroom_thermostat() {
        let devices = demo_devices().unwrap();
        let thermostat = devices
            .iter()
            .find(|d| d.device_id.as_str() == "bedroom/thermostat/wall-01")
            .unwrap();
        assert!(matches!(
            &thermostat.kind,
            DeviceKind::Thermostat { target_temp, current_temp }
                if target_temp.value() == 20 && current_temp.value() == 19
        ));
    }
}
