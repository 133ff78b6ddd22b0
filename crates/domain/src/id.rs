//! Device identifiers — hierarchical `location/kind/instance` strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Hierarchical device identifier of the form `location/kind/instance`.
///
/// Construction normalizes to lowercase with underscores replaced by
/// hyphens, so `Living_Room/Light/Ceiling-01` and
/// `living-room/light/ceiling-01` name the same device. The identifier is
/// immutable and acts as the registry's primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceId(String);

impl DeviceId {
    /// Validate and normalize a raw identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IdSegmentCount`] when the segment count is
    /// not exactly three, or [`ValidationError::IdSegment`] naming the first
    /// segment that is empty, contains a disallowed character, or consists
    /// only of separators.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let segments: Vec<&str> = raw.split('/').collect();
        if segments.len() != 3 {
            return Err(ValidationError::IdSegmentCount {
                id: raw.to_string(),
                found: segments.len(),
            });
        }
        for segment in &segments {
            let charset_ok = segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            let has_substance = segment.chars().any(|c| c.is_ascii_alphanumeric());
            if !charset_ok || !has_substance {
                return Err(ValidationError::IdSegment {
                    segment: (*segment).to_string(),
                });
            }
        }
        Ok(Self(raw.to_ascii_lowercase().replace('_', "-")))
    }

    /// The normalized identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First segment: the room the device lives in.
    #[must_use]
    pub fn room(&self) -> &str {
        self.segment(0)
    }

    /// Second segment: the device kind.
    #[must_use]
    pub fn kind_segment(&self) -> &str {
        self.segment(1)
    }

    /// Third segment: the instance within the room.
    #[must_use]
    pub fn instance(&self) -> &str {
        self.segment(2)
    }

    fn segment(&self, index: usize) -> &str {
        self.0.split('/').nth(index).unwrap_or_default()
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DeviceId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DeviceId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DeviceId> for String {
    fn from(id: DeviceId) -> Self {
        id.0
    }
}
