mod push_subscription;
mod reminder;
mod scheduled_notification;
mod shared;

pub use push_subscription::{InvalidEndpointError, PushSubscription};
pub use reminder::{NotificationTime, Reminder};
pub use scheduled_notification::{
    format_pre_alert_body, PushAction, PushPayload, PushPayloadData, ScheduledNotification,
};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use shared::recurrence::{
    describe_recurrence, next_occurrence, next_occurrences, InvalidRuleError, RecurrencePreset,
    MAX_LOOKAHEAD_MILLIS, RECURRENCE_PRESETS,
};
