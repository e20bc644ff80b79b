use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// A single pending (or historical) notification instant derived from a
/// reminder. Unsent rows are regenerated wholesale whenever the owning
/// reminder mutates; sent rows are immutable history.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledNotification {
    pub id: ID,
    /// Weak back-reference: the reminder may be deleted independently, in
    /// which case the row is reclaimed by the dispatcher as an orphan.
    pub reminder_id: ID,
    /// Epoch millis at which delivery should occur.
    pub fires_at: i64,
    /// The pre-alert offset that produced this entry.
    pub pre_alert_minutes: i64,
    /// Monotonic: flips false to true exactly once, never resets.
    pub sent: bool,
    pub created_at: i64,
}

impl ScheduledNotification {
    pub fn new(reminder_id: ID, fires_at: i64, pre_alert_minutes: i64, created_at: i64) -> Self {
        Self {
            id: ID::new(),
            reminder_id,
            fires_at,
            pre_alert_minutes,
            sent: false,
            created_at,
        }
    }
}

impl Entity for ScheduledNotification {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// Notification payload sent to the push provider and to in-process
/// listeners, in the wire format the service worker consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    /// Grouping key so repeated alerts for the same reminder replace each
    /// other instead of piling up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PushPayloadData>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub actions: Vec<PushAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushPayloadData {
    #[serde(rename = "itemId")]
    pub reminder_id: ID,
    /// Deep-link target opened when the user interacts with the
    /// notification.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushAction {
    pub action: String,
    pub title: String,
}

const DEFAULT_ICON: &str = "/icon-192x192.png";
const DEFAULT_BADGE: &str = "/badge.png";

impl PushPayload {
    /// Render the payload for a due notification. The body falls back to a
    /// phrase derived from the offset when the reminder has no description.
    pub fn for_due_reminder(reminder: &crate::Reminder, pre_alert_minutes: i64) -> Self {
        Self {
            title: reminder.title.clone(),
            body: reminder
                .description
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| format_pre_alert_body(pre_alert_minutes)),
            icon: Some(DEFAULT_ICON.to_string()),
            badge: Some(DEFAULT_BADGE.to_string()),
            tag: Some(format!("reminder-{}", reminder.id)),
            data: Some(PushPayloadData {
                reminder_id: reminder.id.clone(),
                url: format!("/reminders/{}", reminder.id),
            }),
            actions: vec![
                PushAction {
                    action: "view".to_string(),
                    title: "View".to_string(),
                },
                PushAction {
                    action: "dismiss".to_string(),
                    title: "Dismiss".to_string(),
                },
            ],
        }
    }
}

/// "Reminder in 15 minutes", "Reminder in 2 hours", "Reminder is due now".
pub fn format_pre_alert_body(minutes: i64) -> String {
    if minutes == 0 {
        return "Reminder is due now".to_string();
    }
    if minutes < 60 {
        return format!("Reminder in {} minutes", minutes);
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("Reminder in {} hour{}", hours, if hours > 1 { "s" } else { "" });
    }
    let days = hours / 24;
    format!("Reminder in {} day{}", days, if days > 1 { "s" } else { "" })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Reminder;

    fn reminder_with_description(description: Option<&str>) -> Reminder {
        Reminder {
            id: Default::default(),
            title: "Water the plants".to_string(),
            description: description.map(|d| d.to_string()),
            anchor_ts: 0,
            recurrence: None,
            pre_alerts: vec![0],
            active: true,
            timezone: chrono_tz::UTC,
            created_at: 0,
            updated_at: 0,
            deleted_at: None,
        }
    }

    #[test]
    fn formats_pre_alert_body() {
        assert_eq!(format_pre_alert_body(0), "Reminder is due now");
        assert_eq!(format_pre_alert_body(15), "Reminder in 15 minutes");
        assert_eq!(format_pre_alert_body(60), "Reminder in 1 hour");
        assert_eq!(format_pre_alert_body(120), "Reminder in 2 hours");
        assert_eq!(format_pre_alert_body(60 * 24), "Reminder in 1 day");
        assert_eq!(format_pre_alert_body(60 * 24 * 3), "Reminder in 3 days");
    }

    #[test]
    fn payload_prefers_description_over_offset_phrase() {
        let reminder = reminder_with_description(Some("Use the green can"));
        let payload = PushPayload::for_due_reminder(&reminder, 15);
        assert_eq!(payload.body, "Use the green can");

        let reminder = reminder_with_description(None);
        let payload = PushPayload::for_due_reminder(&reminder, 15);
        assert_eq!(payload.body, "Reminder in 15 minutes");

        let reminder = reminder_with_description(Some(""));
        let payload = PushPayload::for_due_reminder(&reminder, 0);
        assert_eq!(payload.body, "Reminder is due now");
    }

    #[test]
    fn payload_tags_and_deep_links_by_reminder_id() {
        let reminder = reminder_with_description(None);
        let payload = PushPayload::for_due_reminder(&reminder, 0);

        assert_eq!(payload.tag, Some(format!("reminder-{}", reminder.id)));
        let data = payload.data.expect("payload data");
        assert_eq!(data.reminder_id, reminder.id);
        assert_eq!(data.url, format!("/reminders/{}", reminder.id));
    }

    #[test]
    fn payload_serializes_in_wire_format() {
        let reminder = reminder_with_description(None);
        let payload = PushPayload::for_due_reminder(&reminder, 15);
        let json = serde_json::to_value(&payload).expect("serializable payload");

        assert_eq!(json["title"], "Water the plants");
        assert_eq!(json["body"], "Reminder in 15 minutes");
        assert_eq!(json["data"]["itemId"], reminder.id.as_string());
        assert_eq!(json["actions"][1]["action"], "dismiss");
    }
}
