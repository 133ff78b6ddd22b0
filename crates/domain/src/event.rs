//! State-change notifications pushed to stream subscribers.

use serde::Serialize;

use crate::device::Device;
use crate::id::DeviceId;

/// Payload broadcast for one committed mutation.
///
/// The `device` field is the full post-mutation state, so a subscriber
/// never has to merge deltas itself.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceUpdate {
    /// The mutated device's identifier.
    pub device_id: DeviceId,
    /// The device state as committed.
    pub device: Device,
}

/// Messages delivered over a stream channel, tagged with `type` on the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamMessage {
    /// Full snapshot, sent once immediately after connect and always before
    /// any delta.
    InitialState {
        /// Every registered device.
        devices: Vec<Device>,
    },
    /// One device's post-mutation state.
    DeviceUpdate {
        /// The mutated device's identifier.
        device_id: DeviceId,
        /// The device state as committed.
        device: Device,
    },
    /// Acknowledges a client `subscribe` frame.
    Subscribed {
        /// Human-readable confirmation.
        message: &'static str,
    },
}

impl From<DeviceUpdate> for StreamMessage {
    fn from(update: DeviceUpdate) -> Self {
        Self::DeviceUpdate {
            device_id: update.device_id,
            device: update.device,
        }
    }
}
