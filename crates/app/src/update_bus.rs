//! In-process update bus backed by a tokio broadcast channel.

use tokio::sync::broadcast;

use domo_domain::event::DeviceUpdate;

/// Fan-out hub for device state-change notifications.
///
/// Publishing succeeds even when there are no live subscribers (the
/// notification is simply dropped). A subscriber that disconnects is
/// cleaned up by the channel when its receiver drops, and one that falls
/// behind skips ahead — neither can block or fail delivery to the others.
/// Within a single subscription, notifications arrive in publish order.
pub struct UpdateBus {
    sender: broadcast::Sender<DeviceUpdate>,
}

impl UpdateBus {
    /// Create a new bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to updates on this bus.
    ///
    /// The receiver sees only updates published *after* the subscription is
    /// created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceUpdate> {
        self.sender.subscribe()
    }

    /// Publish one notification to every live subscriber.
    pub fn publish(&self, update: DeviceUpdate) {
        // send fails only when there are zero receivers, which is fine —
        // the notification is simply dropped.
        let _ = self.sender.send(update);
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
