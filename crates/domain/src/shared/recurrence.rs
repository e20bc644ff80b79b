use chrono::{TimeZone, Utc};
use itertools::Itertools;
use rrule::RRuleSet;
use thiserror::Error;

/// Expansion never looks further than two years past the reference instant.
/// Without this cap an unbounded rule (e.g. yearly with no UNTIL/COUNT)
/// would never terminate.
pub const MAX_LOOKAHEAD_MILLIS: i64 = 2 * 365 * 24 * 60 * 60 * 1000;

const DTSTART_FORMAT: &str = "%Y%m%dT%H%M%SZ";

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid recurrence rule `{rule}`: {reason}")]
pub struct InvalidRuleError {
    pub rule: String,
    pub reason: String,
}

/// The next upcoming occurrences for a reminder anchored at `anchor_ts`.
///
/// Returns at most `count` instants, all `>= now_ts`, all within
/// [`MAX_LOOKAHEAD_MILLIS`] of `now_ts`, strictly ascending and deduplicated.
/// Without a rule the anchor is the sole occurrence and only qualifies while
/// it is still in the future.
pub fn next_occurrences(
    anchor_ts: i64,
    rule: Option<&str>,
    now_ts: i64,
    count: usize,
) -> Result<Vec<i64>, InvalidRuleError> {
    let rule = match rule {
        Some(rule) => rule,
        None => {
            return Ok(if anchor_ts > now_ts {
                vec![anchor_ts]
            } else {
                Vec::new()
            })
        }
    };

    let rrule_set = parse_rule(anchor_ts, rule)?;
    let horizon = now_ts + MAX_LOOKAHEAD_MILLIS;

    Ok(rrule_set
        .into_iter()
        .map(|occurrence| occurrence.timestamp_millis())
        .skip_while(|ts| *ts < now_ts)
        .take_while(|ts| *ts <= horizon)
        .dedup()
        .take(count)
        .collect())
}

/// The single next occurrence, used for "Next: ..." style display without
/// materializing a full schedule.
pub fn next_occurrence(
    anchor_ts: i64,
    rule: Option<&str>,
    now_ts: i64,
) -> Result<Option<i64>, InvalidRuleError> {
    Ok(next_occurrences(anchor_ts, rule, now_ts, 1)?.into_iter().next())
}

fn parse_rule(anchor_ts: i64, rule: &str) -> Result<RRuleSet, InvalidRuleError> {
    let anchor = Utc
        .timestamp_millis_opt(anchor_ts)
        .single()
        .ok_or_else(|| InvalidRuleError {
            rule: rule.to_string(),
            reason: format!("anchor timestamp out of range: {}", anchor_ts),
        })?;

    format!("DTSTART:{}\nRRULE:{}", anchor.format(DTSTART_FORMAT), rule)
        .parse::<RRuleSet>()
        .map_err(|e| InvalidRuleError {
            rule: rule.to_string(),
            reason: format!("{:?}", e),
        })
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecurrencePreset {
    pub label: &'static str,
    /// RRULE body, `None` for one-time.
    pub rule: Option<&'static str>,
    pub description: &'static str,
}

pub const RECURRENCE_PRESETS: [RecurrencePreset; 7] = [
    RecurrencePreset {
        label: "One-time",
        rule: None,
        description: "Does not repeat",
    },
    RecurrencePreset {
        label: "Daily",
        rule: Some("FREQ=DAILY;INTERVAL=1"),
        description: "Every day",
    },
    RecurrencePreset {
        label: "Weekdays",
        rule: Some("FREQ=WEEKLY;BYDAY=MO,TU,WE,TH,FR"),
        description: "Monday through Friday",
    },
    RecurrencePreset {
        label: "Weekly",
        rule: Some("FREQ=WEEKLY;INTERVAL=1"),
        description: "Once a week",
    },
    RecurrencePreset {
        label: "Biweekly",
        rule: Some("FREQ=WEEKLY;INTERVAL=2"),
        description: "Every two weeks",
    },
    RecurrencePreset {
        label: "Monthly",
        rule: Some("FREQ=MONTHLY;INTERVAL=1"),
        description: "Once a month",
    },
    RecurrencePreset {
        label: "Yearly",
        rule: Some("FREQ=YEARLY;INTERVAL=1"),
        description: "Once a year",
    },
];

/// Human description of a rule for display. Unknown and malformed rules both
/// fall back to a generic label, so callers never have to handle a parse
/// failure just to render text.
pub fn describe_recurrence(rule: Option<&str>) -> String {
    match rule {
        None => "One-time".to_string(),
        Some(rule) => RECURRENCE_PRESETS
            .iter()
            .find(|preset| preset.rule == Some(rule))
            .map(|preset| preset.description.to_string())
            .unwrap_or_else(|| "Custom recurrence".to_string()),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const MINUTE: i64 = 60 * 1000;
    const DAY: i64 = 24 * 60 * MINUTE;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn one_time_reminder_in_future_is_sole_occurrence() {
        let anchor = ts(2024, 1, 1, 9, 0);
        let now = ts(2024, 1, 1, 8, 50);
        assert_eq!(
            next_occurrences(anchor, None, now, 10).unwrap(),
            vec![anchor]
        );
        assert_eq!(next_occurrence(anchor, None, now).unwrap(), Some(anchor));
    }

    #[test]
    fn one_time_reminder_in_past_never_recurs() {
        let anchor = ts(2024, 1, 1, 9, 0);
        assert!(next_occurrences(anchor, None, anchor, 10).unwrap().is_empty());
        assert!(next_occurrences(anchor, None, anchor + MINUTE, 10)
            .unwrap()
            .is_empty());
        assert_eq!(next_occurrence(anchor, None, anchor).unwrap(), None);
    }

    #[test]
    fn daily_expansion_is_bounded_sorted_and_deduplicated() {
        let anchor = ts(2024, 1, 1, 9, 0);
        let now = ts(2024, 1, 3, 10, 0);

        let occurrences =
            next_occurrences(anchor, Some("FREQ=DAILY;INTERVAL=1"), now, 5).unwrap();

        assert_eq!(occurrences.len(), 5);
        // First occurrence after 10:00 on Jan 3rd is 09:00 on Jan 4th.
        assert_eq!(occurrences[0], ts(2024, 1, 4, 9, 0));
        for pair in occurrences.windows(2) {
            assert_eq!(pair[1] - pair[0], DAY);
        }
        let horizon = now + MAX_LOOKAHEAD_MILLIS;
        assert!(occurrences.iter().all(|ts| *ts >= now && *ts <= horizon));
    }

    #[test]
    fn expansion_includes_occurrence_at_reference_instant() {
        let anchor = ts(2024, 1, 1, 9, 0);
        let occurrences =
            next_occurrences(anchor, Some("FREQ=DAILY;INTERVAL=1"), anchor, 2).unwrap();
        assert_eq!(occurrences, vec![anchor, anchor + DAY]);
    }

    #[test]
    fn yearly_expansion_stops_at_lookahead_horizon() {
        let anchor = ts(2024, 1, 1, 9, 0);
        let now = anchor - MINUTE;

        let occurrences =
            next_occurrences(anchor, Some("FREQ=YEARLY;INTERVAL=1"), now, 10).unwrap();

        // Only the 2024 and 2025 occurrences fit inside two years.
        assert_eq!(occurrences, vec![anchor, ts(2025, 1, 1, 9, 0)]);
    }

    #[test]
    fn weekday_rule_skips_weekends() {
        // 2024-01-05 is a Friday.
        let anchor = ts(2024, 1, 5, 12, 0);
        let now = anchor - MINUTE;

        let occurrences = next_occurrences(
            anchor,
            Some("FREQ=WEEKLY;BYDAY=MO,TU,WE,TH,FR"),
            now,
            3,
        )
        .unwrap();

        assert_eq!(
            occurrences,
            vec![anchor, ts(2024, 1, 8, 12, 0), ts(2024, 1, 9, 12, 0)]
        );
    }

    #[test]
    fn expansion_never_returns_more_than_count() {
        let anchor = ts(2024, 1, 1, 9, 0);
        let occurrences =
            next_occurrences(anchor, Some("FREQ=DAILY;INTERVAL=1"), anchor - MINUTE, 1).unwrap();
        assert_eq!(occurrences.len(), 1);
    }

    #[test]
    fn malformed_rule_fails_closed() {
        let anchor = ts(2024, 1, 1, 9, 0);
        for bad_rule in ["FREQ=SOMETIMES", "not a rule at all", ";;;"] {
            assert!(
                next_occurrences(anchor, Some(bad_rule), anchor, 10).is_err(),
                "expected rule `{}` to be rejected",
                bad_rule
            );
            assert!(next_occurrence(anchor, Some(bad_rule), anchor).is_err());
        }
    }

    #[test]
    fn describes_presets_and_falls_back_for_custom_rules() {
        assert_eq!(describe_recurrence(None), "One-time");
        assert_eq!(
            describe_recurrence(Some("FREQ=DAILY;INTERVAL=1")),
            "Every day"
        );
        assert_eq!(
            describe_recurrence(Some("FREQ=WEEKLY;BYDAY=MO,TU,WE,TH,FR")),
            "Monday through Friday"
        );
        assert_eq!(
            describe_recurrence(Some("FREQ=MONTHLY;BYSETPOS=2;BYDAY=TU")),
            "Custom recurrence"
        );
        assert_eq!(describe_recurrence(Some("garbage")), "Custom recurrence");
    }
}
