mod inmemory;
mod postgres;

pub use inmemory::InMemoryScheduledNotificationRepo;
pub use postgres::PostgresScheduledNotificationRepo;

use chime_domain::{ScheduledNotification, ID};

#[async_trait::async_trait]
pub trait IScheduledNotificationRepo: Send + Sync {
    /// Atomically delete every unsent entry for the reminder and insert the
    /// replacement set. Sent entries are history and are never touched.
    async fn replace_unsent(
        &self,
        reminder_id: &ID,
        notifications: &[ScheduledNotification],
    ) -> anyhow::Result<()>;
    /// Unsent entries due at or before `before`, ascending by fires_at.
    async fn find_due_unsent(&self, before: i64) -> Vec<ScheduledNotification>;
    /// Unsent entries for one reminder, ascending by fires_at.
    async fn find_unsent_by_reminder(&self, reminder_id: &ID) -> Vec<ScheduledNotification>;
    /// Flip an entry's sent flag. Idempotent; a second call is a no-op.
    async fn mark_sent(&self, notification_id: &ID) -> anyhow::Result<()>;
}
