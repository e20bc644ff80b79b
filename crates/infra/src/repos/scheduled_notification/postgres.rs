use super::IScheduledNotificationRepo;
use chime_domain::{ScheduledNotification, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresScheduledNotificationRepo {
    pool: PgPool,
}

impl PostgresScheduledNotificationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ScheduledNotificationRaw {
    notification_uid: Uuid,
    reminder_uid: Uuid,
    fires_at: i64,
    pre_alert_minutes: i64,
    sent: bool,
    created_at: i64,
}

impl Into<ScheduledNotification> for ScheduledNotificationRaw {
    fn into(self) -> ScheduledNotification {
        ScheduledNotification {
            id: self.notification_uid.into(),
            reminder_id: self.reminder_uid.into(),
            fires_at: self.fires_at,
            pre_alert_minutes: self.pre_alert_minutes,
            sent: self.sent,
            created_at: self.created_at,
        }
    }
}

#[async_trait::async_trait]
impl IScheduledNotificationRepo for PostgresScheduledNotificationRepo {
    async fn replace_unsent(
        &self,
        reminder_id: &ID,
        notifications: &[ScheduledNotification],
    ) -> anyhow::Result<()> {
        // One transaction for the delete + inserts so a concurrent due scan
        // never observes a half-replaced schedule.
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM scheduled_notifications
            WHERE reminder_uid = $1 AND sent = FALSE
            "#,
        )
        .bind(*reminder_id.inner_ref())
        .execute(&mut tx)
        .await?;

        for notification in notifications {
            sqlx::query(
                r#"
                INSERT INTO scheduled_notifications
                (notification_uid, reminder_uid, fires_at, pre_alert_minutes, sent, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(*notification.id.inner_ref())
            .bind(*notification.reminder_id.inner_ref())
            .bind(notification.fires_at)
            .bind(notification.pre_alert_minutes)
            .bind(notification.sent)
            .bind(notification.created_at)
            .execute(&mut tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn find_due_unsent(&self, before: i64) -> Vec<ScheduledNotification> {
        sqlx::query_as::<_, ScheduledNotificationRaw>(
            r#"
            SELECT * FROM scheduled_notifications AS n
            WHERE n.sent = FALSE AND n.fires_at <= $1
            ORDER BY n.fires_at
            "#,
        )
        .bind(before)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!("Unable to query due notifications. Err: {:?}", e);
            Vec::new()
        })
        .into_iter()
        .map(|notification| notification.into())
        .collect()
    }

    async fn find_unsent_by_reminder(&self, reminder_id: &ID) -> Vec<ScheduledNotification> {
        sqlx::query_as::<_, ScheduledNotificationRaw>(
            r#"
            SELECT * FROM scheduled_notifications AS n
            WHERE n.reminder_uid = $1 AND n.sent = FALSE
            ORDER BY n.fires_at
            "#,
        )
        .bind(*reminder_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!(
                "Unable to query unsent notifications for reminder {}. Err: {:?}",
                reminder_id, e
            );
            Vec::new()
        })
        .into_iter()
        .map(|notification| notification.into())
        .collect()
    }

    async fn mark_sent(&self, notification_id: &ID) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE scheduled_notifications
            SET sent = TRUE
            WHERE notification_uid = $1
            "#,
        )
        .bind(*notification_id.inner_ref())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
