mod push_subscription;
mod reminder;
mod scheduled_notification;
mod shared;

pub use push_subscription::{IPushSubscriptionRepo, InMemoryPushSubscriptionRepo};
pub use reminder::{IReminderRepo, InMemoryReminderRepo};
pub use scheduled_notification::{IScheduledNotificationRepo, InMemoryScheduledNotificationRepo};
pub use shared::repo::DeleteResult;

use push_subscription::PostgresPushSubscriptionRepo;
use reminder::PostgresReminderRepo;
use scheduled_notification::PostgresScheduledNotificationRepo;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    /// Read-only view of the reminders table owned by the companion CRUD
    /// service. This server never writes reminder records.
    pub reminders: Arc<dyn IReminderRepo>,
    pub scheduled_notifications: Arc<dyn IScheduledNotificationRepo>,
    pub push_subscriptions: Arc<dyn IPushSubscriptionRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            reminders: Arc::new(PostgresReminderRepo::new(pool.clone())),
            scheduled_notifications: Arc::new(PostgresScheduledNotificationRepo::new(pool.clone())),
            push_subscriptions: Arc::new(PostgresPushSubscriptionRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            reminders: Arc::new(InMemoryReminderRepo::new()),
            scheduled_notifications: Arc::new(InMemoryScheduledNotificationRepo::new()),
            push_subscriptions: Arc::new(InMemoryPushSubscriptionRepo::new()),
        }
    }
}
