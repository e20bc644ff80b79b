mod inmemory;
mod postgres;

pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;

use chime_domain::{Reminder, ID};

/// Read-only view of the reminders table. The table is owned and written by
/// the companion CRUD service; this server only derives schedules from it.
#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    /// Look up a reminder by id, soft-deleted rows included so that callers
    /// can distinguish "deleted" from "never existed".
    async fn find(&self, reminder_id: &ID) -> Option<Reminder>;
    /// All non-deleted, active reminders.
    async fn find_active(&self) -> Vec<Reminder>;
    /// All non-deleted reminders, active or not.
    async fn find_all(&self) -> Vec<Reminder>;
}
