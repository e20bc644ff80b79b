use crate::shared::entity::{Entity, ID};
use crate::shared::recurrence::{next_occurrence, next_occurrences, InvalidRuleError};
use chrono_tz::Tz;
use itertools::Itertools;

/// A time-based reminder, owned and written by the companion CRUD service.
/// This server only ever reads reminders and derives notification schedules
/// from them.
#[derive(Debug, Clone)]
pub struct Reminder {
    pub id: ID,
    pub title: String,
    pub description: Option<String>,
    /// Epoch millis anchoring the recurrence rule. For one-time reminders
    /// this is the sole occurrence.
    pub anchor_ts: i64,
    /// RFC 5545 RRULE body, e.g. `FREQ=DAILY;INTERVAL=1`. `None` = one-time.
    pub recurrence: Option<String>,
    /// Minute offsets before an occurrence at which to notify.
    /// 0 means at the occurrence itself.
    pub pre_alerts: Vec<i64>,
    pub active: bool,
    /// IANA zone for display. Expansion operates on absolute instants and
    /// does not consult it.
    pub timezone: Tz,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

/// One pending notification instant derived from an occurrence and a
/// pre-alert offset.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationTime {
    pub fires_at: i64,
    pub pre_alert_minutes: i64,
    pub occurrence_ts: i64,
}

const MILLIS_PER_MINUTE: i64 = 60 * 1000;

impl Reminder {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    /// Whether this reminder should have a notification schedule at all.
    pub fn is_schedulable(&self) -> bool {
        self.active && !self.is_deleted()
    }

    /// Pre-alert offsets in canonical form: ascending, deduplicated.
    /// Persistence order is not guaranteed by the owning service.
    pub fn sorted_pre_alerts(&self) -> Vec<i64> {
        self.pre_alerts.iter().copied().sorted().dedup().collect()
    }

    /// The next `count` occurrences of this reminder from `now_ts`.
    pub fn upcoming_occurrences(
        &self,
        now_ts: i64,
        count: usize,
    ) -> Result<Vec<i64>, InvalidRuleError> {
        next_occurrences(self.anchor_ts, self.recurrence.as_deref(), now_ts, count)
    }

    /// The next occurrence or `None`, for display.
    pub fn next_occurrence(&self, now_ts: i64) -> Result<Option<i64>, InvalidRuleError> {
        next_occurrence(self.anchor_ts, self.recurrence.as_deref(), now_ts)
    }

    /// All notification instants for the next `occurrence_count` occurrences,
    /// one per pre-alert offset, sorted ascending by `fires_at`. Instants
    /// that are not strictly in the future are dropped, so editing a
    /// reminder never resurrects an alert whose moment has already passed.
    pub fn notification_times(
        &self,
        now_ts: i64,
        occurrence_count: usize,
    ) -> Result<Vec<NotificationTime>, InvalidRuleError> {
        let occurrences = self.upcoming_occurrences(now_ts, occurrence_count)?;
        let pre_alerts = self.sorted_pre_alerts();

        let mut times: Vec<NotificationTime> = occurrences
            .into_iter()
            .flat_map(|occurrence_ts| {
                pre_alerts.iter().map(move |minutes| NotificationTime {
                    fires_at: occurrence_ts - minutes * MILLIS_PER_MINUTE,
                    pre_alert_minutes: *minutes,
                    occurrence_ts,
                })
            })
            .filter(|time| time.fires_at > now_ts)
            .collect();

        times.sort_by_key(|time| time.fires_at);
        Ok(times)
    }
}

impl Entity for Reminder {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .timestamp_millis()
    }

    fn daily_reminder(anchor_ts: i64, pre_alerts: Vec<i64>) -> Reminder {
        Reminder {
            id: Default::default(),
            title: "Morning standup".to_string(),
            description: None,
            anchor_ts,
            recurrence: Some("FREQ=DAILY;INTERVAL=1".to_string()),
            pre_alerts,
            active: true,
            timezone: chrono_tz::UTC,
            created_at: 0,
            updated_at: 0,
            deleted_at: None,
        }
    }

    #[test]
    fn derives_notification_times_for_each_offset_and_occurrence() {
        let anchor = ts(2024, 1, 1, 9, 0);
        let now = ts(2024, 1, 1, 8, 50);
        let reminder = daily_reminder(anchor, vec![0, 15]);

        let times = reminder.notification_times(now, 2).unwrap();

        // Day one's 08:45 pre-alert is already in the past at 08:50 and is
        // dropped; the at-time alert and the full next-day pair remain.
        assert_eq!(
            times
                .iter()
                .map(|t| (t.fires_at, t.pre_alert_minutes))
                .collect::<Vec<_>>(),
            vec![
                (ts(2024, 1, 1, 9, 0), 0),
                (ts(2024, 1, 2, 8, 45), 15),
                (ts(2024, 1, 2, 9, 0), 0),
            ]
        );
    }

    #[test]
    fn two_occurrences_with_two_offsets_yield_four_sorted_times() {
        let anchor = ts(2024, 1, 1, 9, 0);
        let now = ts(2024, 1, 1, 8, 40);
        let reminder = daily_reminder(anchor, vec![0, 15]);

        let times = reminder.notification_times(now, 2).unwrap();

        assert_eq!(
            times
                .iter()
                .map(|t| (t.fires_at, t.pre_alert_minutes))
                .collect::<Vec<_>>(),
            vec![
                (ts(2024, 1, 1, 8, 45), 15),
                (ts(2024, 1, 1, 9, 0), 0),
                (ts(2024, 1, 2, 8, 45), 15),
                (ts(2024, 1, 2, 9, 0), 0),
            ]
        );
    }

    #[test]
    fn past_offsets_are_suppressed_entirely() {
        let anchor = ts(2024, 1, 1, 9, 0);
        let reminder = daily_reminder(anchor, vec![0, 15]);
        // Evaluated after the day-one occurrence: nothing from day one.
        let now = ts(2024, 1, 1, 9, 30);

        let times = reminder.notification_times(now, 1).unwrap();

        assert!(times
            .iter()
            .all(|t| t.occurrence_ts == ts(2024, 1, 2, 9, 0)));
    }

    #[test]
    fn offsets_are_canonicalized_before_use() {
        let anchor = ts(2024, 1, 1, 9, 0);
        let now = ts(2024, 1, 1, 8, 0);
        let reminder = daily_reminder(anchor, vec![30, 0, 30, 15]);

        assert_eq!(reminder.sorted_pre_alerts(), vec![0, 15, 30]);

        let times = reminder.notification_times(now, 1).unwrap();
        assert_eq!(
            times
                .iter()
                .map(|t| t.pre_alert_minutes)
                .collect::<Vec<_>>(),
            vec![30, 15, 0]
        );
    }

    #[test]
    fn invalid_rule_surfaces_as_error() {
        let anchor = ts(2024, 1, 1, 9, 0);
        let mut reminder = daily_reminder(anchor, vec![0]);
        reminder.recurrence = Some("FREQ=NEVERLAND".to_string());

        assert!(reminder.notification_times(anchor, 10).is_err());
        assert!(reminder.next_occurrence(anchor).is_err());
    }

    #[test]
    fn one_time_reminder_schedules_single_pair() {
        let anchor = ts(2024, 1, 1, 9, 0);
        let now = ts(2024, 1, 1, 8, 0);
        let mut reminder = daily_reminder(anchor, vec![0, 15]);
        reminder.recurrence = None;

        let times = reminder.notification_times(now, 10).unwrap();
        assert_eq!(
            times
                .iter()
                .map(|t| (t.fires_at, t.pre_alert_minutes))
                .collect::<Vec<_>>(),
            vec![(ts(2024, 1, 1, 8, 45), 15), (ts(2024, 1, 1, 9, 0), 0)]
        );
    }
}
