//! The device registry — canonical state and the single mutation point.

use std::collections::HashMap;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use domo_domain::device::{Device, DeviceType};
use domo_domain::error::{DomoError, NotFoundError};
use domo_domain::event::DeviceUpdate;
use domo_domain::id::DeviceId;
use domo_domain::patch::DevicePatch;
use domo_domain::stats::DeviceStats;
use domo_domain::time::now;

use crate::update_bus::UpdateBus;

/// Room filter sentinel that bypasses filtering.
pub const ROOM_ALL: &str = "all";

/// Canonical in-memory store of device state.
///
/// All writes go through [`DeviceRegistry::apply_patch`], which validates,
/// merges, and broadcasts under one lock — every committed mutation
/// produces exactly one notification, and notifications for one device can
/// never be observed out of commit order. No other code path writes to the
/// map.
pub struct DeviceRegistry {
    inner: Mutex<Inner>,
    bus: UpdateBus,
}

struct Inner {
    devices: HashMap<DeviceId, Device>,
    /// Key insertion order, so snapshots are deterministic.
    order: Vec<DeviceId>,
}

impl DeviceRegistry {
    /// Create an empty registry publishing on `bus`.
    #[must_use]
    pub fn new(bus: UpdateBus) -> Self {
        Self {
            inner: Mutex::new(Inner {
                devices: HashMap::new(),
                order: Vec::new(),
            }),
            bus,
        }
    }

    /// Bulk-load the initial device set. Startup only; does not broadcast.
    ///
    /// A duplicate identifier replaces the earlier entry in place without
    /// duplicating its position.
    pub fn seed(&self, devices: Vec<Device>) {
        let mut inner = self.inner.lock();
        for device in devices {
            let id = device.device_id.clone();
            if inner.devices.insert(id.clone(), device).is_none() {
                inner.order.push(id);
            }
        }
    }

    /// Snapshot of every device in insertion order.
    #[must_use]
    pub fn all(&self) -> Vec<Device> {
        let inner = self.inner.lock();
        inner
            .order
            .iter()
            .filter_map(|id| inner.devices.get(id).cloned())
            .collect()
    }

    /// Look up one device. Missing ids are not an error here; callers
    /// decide how to surface them.
    #[must_use]
    pub fn get(&self, id: &DeviceId) -> Option<Device> {
        self.inner.lock().devices.get(id).cloned()
    }

    /// Devices in the given room (first identifier segment).
    ///
    /// The [`ROOM_ALL`] sentinel returns everything; underscores in the
    /// query normalize to hyphens, as they do in identifiers.
    #[must_use]
    pub fn by_room(&self, room: &str) -> Vec<Device> {
        if room == ROOM_ALL {
            return self.all();
        }
        let wanted = room.to_ascii_lowercase().replace('_', "-");
        self.all()
            .into_iter()
            .filter(|device| device.device_id.room() == wanted)
            .collect()
    }

    /// Devices of the given kind, in insertion order.
    #[must_use]
    pub fn by_type(&self, device_type: DeviceType) -> Vec<Device> {
        self.all()
            .into_iter()
            .filter(|device| device.device_type() == device_type)
            .collect()
    }

    /// Distinct rooms in insertion order.
    #[must_use]
    pub fn rooms(&self) -> Vec<String> {
        let inner = self.inner.lock();
        let mut rooms: Vec<String> = Vec::new();
        for id in &inner.order {
            let room = id.room();
            if !rooms.iter().any(|existing| existing == room) {
                rooms.push(room.to_string());
            }
        }
        rooms
    }

    /// Validate and merge a sparse patch, stamp `last_updated`, and
    /// broadcast the committed state.
    ///
    /// This is the single mutation entry point: the HTTP PATCH handler,
    /// the telemetry ingestion path, and the simulation driver all funnel
    /// through it.
    ///
    /// # Errors
    ///
    /// [`DomoError::NotFound`] for an unknown id, [`DomoError::Validation`]
    /// when the patch names a field illegal for the device's kind or a
    /// value outside its range. On error the stored device is untouched
    /// and nothing is broadcast.
    #[tracing::instrument(skip(self, patch), fields(device_id = %id))]
    pub fn apply_patch(&self, id: &DeviceId, patch: &DevicePatch) -> Result<Device, DomoError> {
        let mut inner = self.inner.lock();
        let device = inner.devices.get_mut(id).ok_or_else(|| NotFoundError {
            entity: "Device",
            id: id.to_string(),
        })?;
        device.apply_patch(patch, now())?;
        let updated = device.clone();
        // Publish while still holding the lock so notifications for one
        // device keep commit order; the send is synchronous and cheap.
        self.bus.publish(DeviceUpdate {
            device_id: id.clone(),
            device: updated.clone(),
        });
        tracing::info!("device updated");
        Ok(updated)
    }

    /// Derive the aggregate statistics for the current snapshot.
    #[must_use]
    pub fn stats(&self) -> DeviceStats {
        DeviceStats::derive(&self.all())
    }

    /// Subscribe to state-change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceUpdate> {
        self.bus.subscribe()
    }

    /// Number of registered devices.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.inner.lock().devices.len()
    }

    /// Number of live stream subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.bus.subscriber_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::demo_devices;
    use domo_domain::device::DeviceKind;
    use domo_domain::error::ValidationError;

    fn registry() -> DeviceRegistry {
        let registry = DeviceRegistry::new(UpdateBus::new(16));
        registry.seed(demo_devices().unwrap());
        registry
    }

    fn id(raw: &str) -> DeviceId {
        DeviceId::parse(raw).unwrap()
    }

    #[test]
    fn should_preserve_insertion_order_in_snapshots() {
        let registry = registry();
        let all = registry.all();
        assert_eq!(all.len(), 10);
        assert_eq!(all[0].device_id.as_str(), "living-room/lock/front-door-01");
        assert_eq!(all[9].device_id.as_str(), "bathroom/light/shower-01");
    }

    #[test]
    fn should_replace_duplicate_seed_entries_in_place() {
        let registry = registry();
        let renamed = Device::lock(id("living-room/lock/front-door-01"), "Main Entrance Lock");
        registry.seed(vec![renamed]);

        let all = registry.all();
        assert_eq!(all.len(), 10);
        assert_eq!(all[0].name, "Main Entrance Lock");
    }

    #[test]
    fn should_return_none_for_unknown_id() {
        let registry = registry();
        assert!(registry.get(&id("attic/light/none-01")).is_none());
    }

    #[test]
    fn should_filter_by_room() {
        let registry = registry();
        let kitchen = registry.by_room("kitchen");
        assert_eq!(kitchen.len(), 2);
        assert!(
            kitchen
                .iter()
                .all(|device| device.device_id.room() == "kitchen")
        );
    }

    #[test]
    fn should_normalize_room_query_like_identifiers() {
        let registry = registry();
        assert_eq!(registry.by_room("Living_Room").len(), 3);
    }

    #[test]
    fn should_bypass_filtering_for_the_all_sentinel() {
        let registry = registry();
        assert_eq!(registry.by_room(ROOM_ALL).len(), 10);
    }

    #[test]
    fn should_filter_by_type() {
        let registry = registry();
        assert_eq!(registry.by_type(DeviceType::Light).len(), 7);
        assert_eq!(registry.by_type(DeviceType::Thermostat).len(), 2);
        assert_eq!(registry.by_type(DeviceType::Lock).len(), 1);
    }

    #[test]
    fn should_list_rooms_in_insertion_order() {
        let registry = registry();
        assert_eq!(
            registry.rooms(),
            vec!["living-room", "kitchen", "bedroom", "bathroom"]
        );
    }

    #[test]
    fn should_apply_patch_and_return_committed_state() {
        let registry = registry();
        let target = id("living-room/thermostat/wall-01");
        let patch = DevicePatch {
            target_temp: Some(18),
            ..DevicePatch::default()
        };

        let updated = registry.apply_patch(&target, &patch).unwrap();

        assert_eq!(
            updated.kind,
            DeviceKind::Thermostat {
                target_temp: domo_domain::device::TargetTemp::new(18).unwrap(),
                current_temp: domo_domain::device::CurrentTemp::new(21).unwrap(),
            }
        );
        // the stored state equals the returned state
        assert_eq!(registry.get(&target).unwrap(), updated);
    }

    #[test]
    fn should_fail_with_not_found_for_unknown_id() {
        let registry = registry();
        let result = registry.apply_patch(&id("attic/light/none-01"), &DevicePatch::default());
        assert!(matches!(result, Err(DomoError::NotFound(_))));
    }

    #[test]
    fn should_leave_state_unchanged_on_rejected_patch() {
        let registry = registry();
        let target = id("living-room/light/ceiling-01");
        let before = registry.get(&target).unwrap();

        let patch = DevicePatch {
            target_temp: Some(20),
            ..DevicePatch::default()
        };
        let result = registry.apply_patch(&target, &patch);

        assert!(matches!(
            result,
            Err(DomoError::Validation(ValidationError::FieldNotAllowed {
                field: "target_temp",
                ..
            }))
        ));
        assert_eq!(registry.get(&target).unwrap(), before);
    }

    #[tokio::test]
    async fn should_broadcast_exactly_once_per_committed_mutation() {
        let registry = registry();
        let mut rx = registry.subscribe();
        let target = id("living-room/thermostat/wall-01");

        let updated = registry
            .apply_patch(
                &target,
                &DevicePatch {
                    target_temp: Some(18),
                    ..DevicePatch::default()
                },
            )
            .unwrap();

        let notification = rx.recv().await.unwrap();
        assert_eq!(notification.device_id, target);
        // the broadcast payload equals the post-mutation registry state
        assert_eq!(notification.device, updated);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn should_not_broadcast_rejected_mutations() {
        let registry = registry();
        let mut rx = registry.subscribe();

        let _ = registry.apply_patch(
            &id("living-room/light/ceiling-01"),
            &DevicePatch {
                target_temp: Some(20),
                ..DevicePatch::default()
            },
        );
        let _ = registry.apply_patch(&id("attic/light/none-01"), &DevicePatch::default());

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn should_derive_seed_statistics() {
        let registry = registry();
        let stats = registry.stats();
        assert_eq!(stats.lighting, "4/7 Active");
        assert_eq!(stats.temperature, "20\u{b0}C Average");
        assert_eq!(stats.security, "All Locked");
        assert_eq!(stats.total_devices, 10);
    }

    #[test]
    fn should_not_seed_broadcasts() {
        let registry = DeviceRegistry::new(UpdateBus::new(16));
        let mut rx = registry.subscribe();
        registry.seed(demo_devices().unwrap());
        assert!(rx.try_recv().is_err());
    }
}
