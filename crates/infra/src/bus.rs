use chime_domain::ID;
use tokio::sync::broadcast;

/// Change events emitted after schedule-store mutations. Consumers (UI
/// shells, caches) subscribe explicitly; the scheduling core itself only
/// publishes and never depends on anyone listening.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// The unsent schedule for a reminder was regenerated.
    ScheduleSynced { reminder_id: ID },
    /// A schedule entry was marked sent (delivered or reclaimed).
    NotificationSent { notification_id: ID },
    /// A push subscription was registered or removed.
    SubscriptionsChanged,
}

#[derive(Debug, Clone)]
pub struct ChangeBus {
    tx: broadcast::Sender<StoreEvent>,
}

const BUS_CAPACITY: usize = 256;

impl ChangeBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }

    /// Publishing with no live subscribers is a no-op, not an error.
    pub fn publish(&self, event: StoreEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}
