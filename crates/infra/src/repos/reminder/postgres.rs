use super::IReminderRepo;
use chime_domain::{Reminder, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    reminder_uid: Uuid,
    title: String,
    description: Option<String>,
    anchor_ts: i64,
    recurrence: Option<String>,
    pre_alerts: Vec<i64>,
    active: bool,
    timezone: String,
    created_at: i64,
    updated_at: i64,
    deleted_at: Option<i64>,
}

impl Into<Reminder> for ReminderRaw {
    fn into(self) -> Reminder {
        Reminder {
            id: self.reminder_uid.into(),
            title: self.title,
            description: self.description,
            anchor_ts: self.anchor_ts,
            recurrence: self.recurrence,
            pre_alerts: self.pre_alerts,
            active: self.active,
            timezone: self.timezone.parse().unwrap_or(chrono_tz::UTC),
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.reminder_uid = $1
            "#,
        )
        .bind(*reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!("Unable to find reminder {}. Err: {:?}", reminder_id, e);
            None
        })
        .map(|reminder| reminder.into())
    }

    async fn find_active(&self) -> Vec<Reminder> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.deleted_at IS NULL AND r.active
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!("Unable to list active reminders. Err: {:?}", e);
            Vec::new()
        })
        .into_iter()
        .map(|reminder| reminder.into())
        .collect()
    }

    async fn find_all(&self) -> Vec<Reminder> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.deleted_at IS NULL
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!("Unable to list reminders. Err: {:?}", e);
            Vec::new()
        })
        .into_iter()
        .map(|reminder| reminder.into())
        .collect()
    }
}
