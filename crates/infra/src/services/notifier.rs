use chime_domain::PushPayload;
use tokio::sync::broadcast;

/// In-process notification surface. The production implementation hands the
/// payload to whatever shell is embedding this server (desktop tray, dev
/// console, test harness) over a broadcast channel.
pub trait INotifier: Send + Sync {
    /// Attempt to show a notification. Failure means nobody is listening,
    /// the in-process analog of revoked notification permission.
    fn notify(&self, payload: PushPayload) -> anyhow::Result<()>;
}

const CHANNEL_CAPACITY: usize = 64;

pub struct ChannelNotifier {
    tx: broadcast::Sender<PushPayload>,
}

impl ChannelNotifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Explicit subscription for consumers that render notifications.
    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<PushPayload> {
        self.tx.subscribe()
    }
}

impl Default for ChannelNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl INotifier for ChannelNotifier {
    fn notify(&self, payload: PushPayload) -> anyhow::Result<()> {
        self.tx
            .send(payload)
            .map(|_| ())
            .map_err(|_| anyhow::anyhow!("no active notification listeners"))
    }
}
