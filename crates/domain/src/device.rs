//! Device model — the closed set of simulated device kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::DeviceId;
use crate::time::{Timestamp, now};

/// Kind tag for the closed set of device variants.
///
/// The set is fixed and exhaustively matched everywhere (validation,
/// statistics, serialization); do not treat it as extensible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    /// Dimmable light with a color-temperature label.
    Light,
    /// Thermostat with target and current temperatures.
    Thermostat,
    /// Door lock.
    Lock,
}

impl DeviceType {
    /// The lowercase tag used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Thermostat => "thermostat",
            Self::Lock => "lock",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! bounded_field {
    ($(#[doc = $doc:expr])* $name:ident, $field:literal, $min:literal ..= $max:literal) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "i32", into = "i32")]
        pub struct $name(i32);

        impl $name {
            /// Inclusive lower bound.
            pub const MIN: Self = Self($min);

            /// Inclusive upper bound.
            pub const MAX: Self = Self($max);

            /// Validate a raw value against the inclusive bounds.
            ///
            /// # Errors
            ///
            /// Returns [`ValidationError::OutOfRange`] naming the field,
            /// the bounds, and the offending value.
            pub fn new(value: i32) -> Result<Self, ValidationError> {
                if !($min..=$max).contains(&value) {
                    return Err(ValidationError::OutOfRange {
                        field: $field,
                        min: $min,
                        max: $max,
                        value,
                    });
                }
                Ok(Self(value))
            }

            /// Force a raw value into bounds.
            #[must_use]
            pub const fn clamped(value: i32) -> Self {
                if value < $min {
                    Self($min)
                } else if value > $max {
                    Self($max)
                } else {
                    Self(value)
                }
            }

            /// The raw value.
            #[must_use]
            pub const fn value(self) -> i32 {
                self.0
            }
        }

        impl TryFrom<i32> for $name {
            type Error = ValidationError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

bounded_field!(
    /// Light brightness as a percentage (0–100 inclusive).
    Brightness,
    "brightness",
    0..=100
);

bounded_field!(
    /// Thermostat set-point in degrees Celsius (16–30 inclusive).
    TargetTemp,
    "target_temp",
    16..=30
);

bounded_field!(
    /// Measured temperature in degrees Celsius (−20–50 inclusive).
    CurrentTemp,
    "current_temp",
    -20..=50
);

/// Kind-specific device state, flattened into [`Device`] on the wire with
/// the `device_type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "device_type", rename_all = "lowercase")]
pub enum DeviceKind {
    /// Dimmable light.
    Light {
        /// Brightness percentage.
        brightness: Brightness,
        /// Free-form color-temperature label (`white`, `warm`, …).
        color_temp: String,
    },
    /// Thermostat.
    Thermostat {
        /// Desired temperature.
        target_temp: TargetTemp,
        /// Last measured temperature.
        current_temp: CurrentTemp,
    },
    /// Door lock.
    Lock {
        /// Whether the bolt is engaged.
        is_locked: bool,
    },
}

/// A simulated smart-home device.
///
/// The kind is immutable after construction and determines which patch
/// fields are legal (see [`crate::patch`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Registry primary key.
    pub device_id: DeviceId,
    /// Human-readable display name.
    pub name: String,
    /// Power state; every device defaults to on.
    pub is_on: bool,
    /// When the device last changed, stamped on every committed mutation.
    pub last_updated: Timestamp,
    /// Kind tag plus kind-specific fields.
    #[serde(flatten)]
    pub kind: DeviceKind,
}

impl Device {
    /// A light with the default brightness (65), color (`white`), and
    /// power state (on).
    #[must_use]
    pub fn light(device_id: DeviceId, name: impl Into<String>) -> Self {
        Self {
            device_id,
            name: name.into(),
            is_on: true,
            last_updated: now(),
            kind: DeviceKind::Light {
                brightness: Brightness::clamped(65),
                color_temp: "white".to_string(),
            },
        }
    }

    /// A thermostat with the default target (22 °C) and current (21 °C)
    /// temperatures, on.
    #[must_use]
    pub fn thermostat(device_id: DeviceId, name: impl Into<String>) -> Self {
        Self {
            device_id,
            name: name.into(),
            is_on: true,
            last_updated: now(),
            kind: DeviceKind::Thermostat {
                target_temp: TargetTemp::clamped(22),
                current_temp: CurrentTemp::clamped(21),
            },
        }
    }

    /// A lock, engaged and on.
    #[must_use]
    pub fn lock(device_id: DeviceId, name: impl Into<String>) -> Self {
        Self {
            device_id,
            name: name.into(),
            is_on: true,
            last_updated: now(),
            kind: DeviceKind::Lock { is_locked: true },
        }
    }

    /// The kind tag of this device.
    #[must_use]
    pub const fn device_type(&self) -> DeviceType {
        match self.kind {
            DeviceKind::Light { .. } => DeviceType::Light,
            DeviceKind::Thermostat { .. } => DeviceType::Thermostat,
            DeviceKind::Lock { .. } => DeviceType::Lock,
        }
    }

    /// Replace the brightness of a light.
    ///
    /// # Errors
    ///
    /// [`ValidationError::FieldNotAllowed`] when the device is not a light,
    /// [`ValidationError::OutOfRange`] when the value is out of bounds.
    pub fn with_brightness(mut self, value: i32) -> Result<Self, ValidationError> {
        match &mut self.kind {
            DeviceKind::Light { brightness, .. } => {
                *brightness = Brightness::new(value)?;
                Ok(self)
            }
            _ => Err(ValidationError::FieldNotAllowed {
                field: "brightness",
                device_type: self.device_type(),
            }),
        }
    }

    /// Replace the color-temperature label of a light.
    ///
    /// # Errors
    ///
    /// [`ValidationError::FieldNotAllowed`] when the device is not a light.
    pub fn with_color_temp(mut self, color: impl Into<String>) -> Result<Self, ValidationError> {
        match &mut self.kind {
            DeviceKind::Light { color_temp, .. } => {
                *color_temp = color.into();
                Ok(self)
            }
            _ => Err(ValidationError::FieldNotAllowed {
                field: "color_temp",
                device_type: self.device_type(),
            }),
        }
    }

    /// Replace the target temperature of a thermostat.
    ///
    /// # Errors
    ///
    /// [`ValidationError::FieldNotAllowed`] when the device is not a
    /// thermostat, [`ValidationError::OutOfRange`] when out of bounds.
    pub fn with_target_temp(mut self, value: i32) -> Result<Self, ValidationError> {
        match &mut self.kind {
            DeviceKind::Thermostat { target_temp, .. } => {
                *target_temp = TargetTemp::new(value)?;
                Ok(self)
            }
            _ => Err(ValidationError::FieldNotAllowed {
                field: "target_temp",
                device_type: self.device_type(),
            }),
        }
    }

    /// Replace the current temperature of a thermostat.
    ///
    /// # Errors
    ///
    /// [`ValidationError::FieldNotAllowed`] when the device is not a
    /// thermostat, [`ValidationError::OutOfRange`] when out of bounds.
    pub fn with_current_temp(mut self, value: i32) -> Result<Self, ValidationError> {
        match &mut self.kind {
            DeviceKind::Thermostat { current_temp, .. } => {
                *current_temp = CurrentTemp::new(value)?;
                Ok(self)
            }
            _ => Err(ValidationError::FieldNotAllowed {
                field: "current_temp",
                device_type: self.device_type(),
            }),
        }
    }

    /// Mark the device as powered off.
    #[must_use]
    pub fn off(mut self) -> Self {
        self.is_on = false;
        self
    }
}
