//! Common error types used across the workspace.
//!
//! The taxonomy is deliberately small: a request either names a device that
//! does not exist ([`NotFoundError`]) or asks for something the schema
//! forbids ([`ValidationError`]). Transient IO failures (a dead stream
//! subscriber, an unreadable sensor reading) never surface here — they are
//! logged and healed where they occur.

use crate::device::DeviceType;

/// Top-level error returned by registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomoError {
    /// The request violated the device schema or a field constraint.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The referenced device does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
}

impl DomoError {
    /// Machine-readable error kind, used in HTTP error bodies.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
        }
    }
}

/// A rejected identifier or patch.
///
/// A validation failure always rejects the whole operation; nothing is
/// partially applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The identifier does not have the `location/kind/instance` shape.
    #[error("device id `{id}` must have exactly three segments (location/kind/instance), found {found}")]
    IdSegmentCount {
        /// The identifier as supplied.
        id: String,
        /// Number of segments found.
        found: usize,
    },
    /// An identifier segment contains characters outside the allowed set.
    #[error("device id segment `{segment}` must be alphanumeric with hyphens or underscores")]
    IdSegment {
        /// The offending segment.
        segment: String,
    },
    /// A numeric field fell outside its inclusive bounds.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// The field being set.
        field: &'static str,
        /// Inclusive lower bound.
        min: i32,
        /// Inclusive upper bound.
        max: i32,
        /// The offending value.
        value: i32,
    },
    /// A patch named a field that the device's kind does not have.
    #[error("field `{field}` cannot be set on a {device_type} device")]
    FieldNotAllowed {
        /// The illegal field.
        field: &'static str,
        /// The kind of the targeted device.
        device_type: DeviceType,
    },
}

/// A lookup failed because the identifier is unknown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} `{id}` not found")]
pub struct NotFoundError {
    /// What was being looked up.
    pub entity: &'static str,
    /// The identifier that matched nothing.
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_render_field_level_reason_for_out_of_range() {
        let err = ValidationError::OutOfRange {
            field: "brightness",
            min: 0,
            max: 100,
            value: 150,
        };
        assert_eq!(err.to_string(), "brightness must be between 0 and 100, got 150");
    }

    #[test]
    fn should_render_kind_in_field_not_allowed() {
        let err = ValidationError::FieldNotAllowed {
            field: "target_temp",
            device_type: DeviceType::Light,
        };
        assert_eq!(
            err.to_string(),
            "field `target_temp` cannot be set on a light device"
        );
    }

    #[test]
    fn should_expose_machine_readable_kind() {
        let validation: DomoError = ValidationError::IdSegment {
            segment: "a!b".to_string(),
        }
        .into();
        assert_eq!(validation.kind(), "validation");

        let missing: DomoError = NotFoundError {
            entity: "Device",
            id: "attic/light/none-01".to_string(),
        }
        .into();
        assert_eq!(missing.kind(), "not_found");
    }

    #[test]
    fn should_pass_through_inner_message() {
        let err: DomoError = NotFoundError {
            entity: "Device",
            id: "attic/light/none-01".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Device `attic/light/none-01` not found");
    }
}
