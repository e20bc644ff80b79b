use super::IReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use chime_domain::{Reminder, ID};
use std::sync::Mutex;

pub struct InMemoryReminderRepo {
    reminders: Mutex<Vec<Reminder>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: Mutex::new(Vec::new()),
        }
    }

    // The write operations below mimic the owning CRUD service and exist
    // only so tests can seed and mutate reminders. They are deliberately
    // not part of `IReminderRepo`.

    pub fn insert(&self, reminder: &Reminder) {
        insert(reminder, &self.reminders);
    }

    pub fn save(&self, reminder: &Reminder) {
        save(reminder, &self.reminders);
    }

    pub fn remove(&self, reminder_id: &ID) -> Option<Reminder> {
        delete(reminder_id, &self.reminders)
    }
}

impl Default for InMemoryReminderRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        find(reminder_id, &self.reminders)
    }

    async fn find_active(&self) -> Vec<Reminder> {
        find_by(&self.reminders, |r: &Reminder| {
            !r.is_deleted() && r.active
        })
    }

    async fn find_all(&self) -> Vec<Reminder> {
        find_by(&self.reminders, |r: &Reminder| !r.is_deleted())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn reminder(active: bool, deleted: bool) -> Reminder {
        Reminder {
            id: Default::default(),
            title: "Stand up".to_string(),
            description: None,
            anchor_ts: 0,
            recurrence: None,
            pre_alerts: vec![0],
            active,
            timezone: chrono_tz::UTC,
            created_at: 0,
            updated_at: 0,
            deleted_at: if deleted { Some(1) } else { None },
        }
    }

    #[tokio::test]
    async fn listing_treats_soft_deleted_reminders_as_absent() {
        let repo = InMemoryReminderRepo::new();
        let active = reminder(true, false);
        let paused = reminder(false, false);
        let deleted = reminder(true, true);
        repo.insert(&active);
        repo.insert(&paused);
        repo.insert(&deleted);

        assert_eq!(
            repo.find_active()
                .await
                .iter()
                .map(|r| r.id.clone())
                .collect::<Vec<_>>(),
            vec![active.id.clone()]
        );
        assert_eq!(repo.find_all().await.len(), 2);
        // Lookup by id still resolves the soft-deleted row so callers can
        // tell "deleted" apart from "never existed".
        assert!(repo.find(&deleted.id).await.is_some());
        assert!(repo.find(&ID::new()).await.is_none());
    }
}
