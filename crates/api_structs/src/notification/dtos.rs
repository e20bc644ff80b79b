use chime_domain::{ScheduledNotification, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledNotificationDTO {
    pub id: ID,
    pub reminder_id: ID,
    pub fires_at: i64,
    pub pre_alert_minutes: i64,
    pub sent: bool,
    pub created_at: i64,
}

impl ScheduledNotificationDTO {
    pub fn new(notification: ScheduledNotification) -> Self {
        Self {
            id: notification.id,
            reminder_id: notification.reminder_id,
            fires_at: notification.fires_at,
            pre_alert_minutes: notification.pre_alert_minutes,
            sent: notification.sent,
            created_at: notification.created_at,
        }
    }
}
