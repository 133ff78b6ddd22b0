//! Sparse partial updates and their all-or-nothing validation.

use serde::Deserialize;

use crate::device::{Brightness, CurrentTemp, Device, DeviceKind, DeviceType, TargetTemp};
use crate::error::ValidationError;
use crate::time::Timestamp;

/// A sparse set of requested field changes.
///
/// Fields absent from the patch are left untouched; there is no way to
/// explicitly unset a field. Unknown JSON fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DevicePatch {
    /// Power state, any kind.
    pub is_on: Option<bool>,
    /// Light brightness percentage.
    pub brightness: Option<i32>,
    /// Light color-temperature label.
    pub color_temp: Option<String>,
    /// Thermostat set-point.
    pub target_temp: Option<i32>,
    /// Thermostat measured temperature.
    pub current_temp: Option<i32>,
    /// Lock bolt state.
    pub is_locked: Option<bool>,
}

impl DevicePatch {
    /// Whether the patch requests no changes at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.is_on.is_none()
            && self.brightness.is_none()
            && self.color_temp.is_none()
            && self.target_temp.is_none()
            && self.current_temp.is_none()
            && self.is_locked.is_none()
    }
}

/// Fields validated against a device's kind, ready to merge.
struct ValidatedPatch {
    brightness: Option<Brightness>,
    target_temp: Option<TargetTemp>,
    current_temp: Option<CurrentTemp>,
}

impl Device {
    /// Validate `patch` against this device's kind and merge it.
    ///
    /// The merge is all-or-nothing: every check runs before the first field
    /// is written, so a rejected patch leaves the device exactly as it was.
    /// On success `last_updated` is stamped with `at`, even for an empty
    /// patch.
    ///
    /// # Errors
    ///
    /// [`ValidationError::FieldNotAllowed`] when the patch names a field
    /// illegal for this kind; [`ValidationError::OutOfRange`] when an
    /// accepted numeric field fails its bound.
    pub fn apply_patch(&mut self, patch: &DevicePatch, at: Timestamp) -> Result<(), ValidationError> {
        let validated = self.validate_patch(patch)?;

        if let Some(is_on) = patch.is_on {
            self.is_on = is_on;
        }
        match &mut self.kind {
            DeviceKind::Light { brightness, color_temp } => {
                if let Some(value) = validated.brightness {
                    *brightness = value;
                }
                if let Some(value) = &patch.color_temp {
                    *color_temp = value.clone();
                }
            }
            DeviceKind::Thermostat { target_temp, current_temp } => {
                if let Some(value) = validated.target_temp {
                    *target_temp = value;
                }
                if let Some(value) = validated.current_temp {
                    *current_temp = value;
                }
            }
            DeviceKind::Lock { is_locked } => {
                if let Some(value) = patch.is_locked {
                    *is_locked = value;
                }
            }
        }
        self.last_updated = at;
        Ok(())
    }

    /// Enforce the kind-specific field policy, then range-check whatever
    /// the kind accepts. Fields a kind neither owns nor explicitly rejects
    /// (for example `is_locked` on a light) are silently dropped, matching
    /// the sparse-merge semantics.
    fn validate_patch(&self, patch: &DevicePatch) -> Result<ValidatedPatch, ValidationError> {
        let reject = |field: &'static str, device_type: DeviceType| {
            Err(ValidationError::FieldNotAllowed { field, device_type })
        };

        let mut validated = ValidatedPatch {
            brightness: None,
            target_temp: None,
            current_temp: None,
        };

        match self.kind {
            DeviceKind::Light { .. } => {
                if patch.target_temp.is_some() {
                    return reject("target_temp", DeviceType::Light);
                }
                if patch.current_temp.is_some() {
                    return reject("current_temp", DeviceType::Light);
                }
                validated.brightness = patch.brightness.map(Brightness::new).transpose()?;
            }
            DeviceKind::Thermostat { .. } => {
                if patch.brightness.is_some() {
                    return reject("brightness", DeviceType::Thermostat);
                }
                if patch.color_temp.is_some() {
                    return reject("color_temp", DeviceType::Thermostat);
                }
                validated.target_temp = patch.target_temp.map(TargetTemp::new).transpose()?;
                validated.current_temp = patch.current_temp.map(CurrentTemp::new).transpose()?;
            }
            DeviceKind::Lock { .. } => {
                if patch.brightness.is_some() {
                    return reject("brightness", DeviceType::Lock);
                }
                if patch.color_temp.is_some() {
                    return reject("color_temp", DeviceType::Lock);
                }
                if patch.target_temp.is_some() {
                    return reject("target_temp", DeviceType::Lock);
                }
            }
        }
        Ok(validated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::DeviceId;
    use crate::time::now;

    fn light() -> Device {
        Device::light(
            DeviceId::parse("living-room/light/ceiling-01").unwrap(),
            "Living Room Light",
        )
    }

    fn thermostat() -> Device {
        Device::thermostat(
            DeviceId::parse("living-room/thermostat/wall-01").unwrap(),
            "Smart Thermostat",
        )
    }

    fn lock() -> Device {
        Device::lock(
            DeviceId::parse("living-room/lock/front-door-01").unwrap(),
            "Front Door Lock",
        )
    }

    #[test]
    fn should_merge_accepted_fields_and_stamp_timestamp() {
        let mut device = thermostat();
        let before = device.last_updated;
        let at = now();
        let patch = DevicePatch {
            target_temp: Some(18),
            ..DevicePatch::default()
        };

        device.apply_patch(&patch, at).unwrap();

        assert_eq!(
            device.kind,
            DeviceKind::Thermostat {
                target_temp: TargetTemp::new(18).unwrap(),
                current_temp: CurrentTemp::new(21).unwrap(),
            }
        );
        assert_ne!(device.last_updated, before);
        assert_eq!(device.last_updated, at);
    }

    #[test]
    fn should_leave_absent_fields_untouched() {
        let mut device = light();
        let patch = DevicePatch {
            is_on: Some(false),
            ..DevicePatch::default()
        };

        device.apply_patch(&patch, now()).unwrap();

        assert!(!device.is_on);
        assert_eq!(
            device.kind,
            DeviceKind::Light {
                brightness: Brightness::new(65).unwrap(),
                color_temp: "white".to_string(),
            }
        );
    }

    #[test]
    fn should_reject_temperature_fields_on_light_without_side_effects() {
        let mut device = light();
        let snapshot = device.clone();
        let patch = DevicePatch {
            is_on: Some(false),
            target_temp: Some(20),
            ..DevicePatch::default()
        };

        let err = device.apply_patch(&patch, now()).unwrap_err();

        assert_eq!(
            err,
            ValidationError::FieldNotAllowed {
                field: "target_temp",
                device_type: DeviceType::Light,
            }
        );
        // all-or-nothing: the accepted is_on change must not have landed
        assert_eq!(device, snapshot);
    }

    #[test]
    fn should_reject_light_fields_on_thermostat() {
        let mut device = thermostat();
        let snapshot = device.clone();
        let patch = DevicePatch {
            brightness: Some(50),
            ..DevicePatch::default()
        };

        let err = device.apply_patch(&patch, now()).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::FieldNotAllowed {
                field: "brightness",
                device_type: DeviceType::Thermostat,
            }
        ));
        assert_eq!(device, snapshot);
    }

    #[test]
    fn should_reject_light_and_thermostat_fields_on_lock() {
        for patch in [
            DevicePatch {
                brightness: Some(10),
                ..DevicePatch::default()
            },
            DevicePatch {
                color_temp: Some("warm".to_string()),
                ..DevicePatch::default()
            },
            DevicePatch {
                target_temp: Some(20),
                ..DevicePatch::default()
            },
        ] {
            let mut device = lock();
            let snapshot = device.clone();
            assert!(device.apply_patch(&patch, now()).is_err());
            assert_eq!(device, snapshot);
        }
    }

    #[test]
    fn should_reject_out_of_range_value_without_side_effects() {
        let mut device = light();
        let snapshot = device.clone();
        let patch = DevicePatch {
            brightness: Some(101),
            ..DevicePatch::default()
        };

        let err = device.apply_patch(&patch, now()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                field: "brightness",
                min: 0,
                max: 100,
                value: 101,
            }
        );
        assert_eq!(device, snapshot);
    }

    #[test]
    fn should_accept_values_at_the_exact_bounds() {
        let mut device = light();
        let patch = DevicePatch {
            brightness: Some(100),
            ..DevicePatch::default()
        };
        device.apply_patch(&patch, now()).unwrap();
        assert!(matches!(
            device.kind,
            DeviceKind::Light { brightness, .. } if brightness.value() == 100
        ));

        let mut device = thermostat();
        let patch = DevicePatch {
            current_temp: Some(-20),
            ..DevicePatch::default()
        };
        device.apply_patch(&patch, now()).unwrap();
        assert!(matches!(
            device.kind,
            DeviceKind::Thermostat { current_temp, .. } if current_temp.value() == -20
        ));
    }

    #[test]
    fn should_toggle_lock_state() {
        let mut device = lock();
        let patch = DevicePatch {
            is_locked: Some(false),
            ..DevicePatch::default()
        };
        device.apply_patch(&patch, now()).unwrap();
        assert_eq!(device.kind, DeviceKind::Lock { is_locked: false });
    }

    #[test]
    fn should_stamp_timestamp_for_empty_patch() {
        let mut device = light();
        let at = now();
        device.apply_patch(&DevicePatch::default(), at).unwrap();
        assert_eq!(device.last_updated, at);
    }

    #[test]
    fn should_deserialize_sparse_patch_ignoring_unknown_fields() {
        let patch: DevicePatch =
            serde_json::from_str(r#"{"target_temp": 18, "unknown_field": 1}"#).unwrap();
        assert_eq!(patch.target_temp, Some(18));
        assert!(patch.is_on.is_none());
        assert!(!patch.is_empty());
        assert!(DevicePatch::default().is_empty());
    }
}
