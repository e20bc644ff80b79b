use super::IScheduledNotificationRepo;
use crate::repos::shared::inmemory_repo::*;
use chime_domain::{ScheduledNotification, ID};
use std::sync::Mutex;

pub struct InMemoryScheduledNotificationRepo {
    notifications: Mutex<Vec<ScheduledNotification>>,
}

impl InMemoryScheduledNotificationRepo {
    pub fn new() -> Self {
        Self {
            notifications: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryScheduledNotificationRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IScheduledNotificationRepo for InMemoryScheduledNotificationRepo {
    async fn replace_unsent(
        &self,
        reminder_id: &ID,
        notifications: &[ScheduledNotification],
    ) -> anyhow::Result<()> {
        // Delete + insert under one lock so a reader never observes the
        // half-replaced state the postgres implementation avoids with a
        // transaction.
        let mut collection = self.notifications.lock().unwrap();
        collection.retain(|n| n.sent || &n.reminder_id != reminder_id);
        collection.extend_from_slice(notifications);
        Ok(())
    }

    async fn find_due_unsent(&self, before: i64) -> Vec<ScheduledNotification> {
        let mut due = find_by(&self.notifications, |n: &ScheduledNotification| {
            !n.sent && n.fires_at <= before
        });
        due.sort_by_key(|n| n.fires_at);
        due
    }

    async fn find_unsent_by_reminder(&self, reminder_id: &ID) -> Vec<ScheduledNotification> {
        let mut unsent = find_by(&self.notifications, |n: &ScheduledNotification| {
            !n.sent && &n.reminder_id == reminder_id
        });
        unsent.sort_by_key(|n| n.fires_at);
        unsent
    }

    async fn mark_sent(&self, notification_id: &ID) -> anyhow::Result<()> {
        update_many(
            &self.notifications,
            |n: &ScheduledNotification| &n.id == notification_id,
            |n| n.sent = true,
        );
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn notification(reminder_id: &ID, fires_at: i64) -> ScheduledNotification {
        ScheduledNotification::new(reminder_id.clone(), fires_at, 0, 0)
    }

    #[tokio::test]
    async fn replace_unsent_spares_sent_history() {
        let repo = InMemoryScheduledNotificationRepo::new();
        let reminder_id = ID::new();

        let old = notification(&reminder_id, 100);
        repo.replace_unsent(&reminder_id, &[old.clone()]).await.unwrap();
        repo.mark_sent(&old.id).await.unwrap();

        let fresh = notification(&reminder_id, 200);
        repo.replace_unsent(&reminder_id, &[fresh.clone()]).await.unwrap();

        let unsent = repo.find_unsent_by_reminder(&reminder_id).await;
        assert_eq!(unsent, vec![fresh]);
        // The sent entry is still there, visible to a due scan.
        let due = repo.find_due_unsent(1000).await;
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].fires_at, 200);
    }

    #[tokio::test]
    async fn due_scan_is_sorted_and_excludes_future_entries() {
        let repo = InMemoryScheduledNotificationRepo::new();
        let reminder_id = ID::new();

        let entries = vec![
            notification(&reminder_id, 300),
            notification(&reminder_id, 100),
            notification(&reminder_id, 900),
        ];
        repo.replace_unsent(&reminder_id, &entries).await.unwrap();

        let due = repo.find_due_unsent(500).await;
        assert_eq!(due.iter().map(|n| n.fires_at).collect::<Vec<_>>(), vec![100, 300]);
    }

    #[tokio::test]
    async fn mark_sent_is_idempotent() {
        let repo = InMemoryScheduledNotificationRepo::new();
        let reminder_id = ID::new();
        let entry = notification(&reminder_id, 100);
        repo.replace_unsent(&reminder_id, &[entry.clone()]).await.unwrap();

        repo.mark_sent(&entry.id).await.unwrap();
        repo.mark_sent(&entry.id).await.unwrap();

        assert!(repo.find_due_unsent(1000).await.is_empty());
    }
}
