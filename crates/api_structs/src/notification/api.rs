use crate::dtos::ScheduledNotificationDTO;
use chime_domain::{ScheduledNotification, ID};
use serde::{Deserialize, Serialize};

pub mod check_notifications {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct APIResponse {
        pub checked: usize,
        pub sent: usize,
        pub timestamp: String,
    }
}

pub mod sync_schedule {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub notifications: Vec<ScheduledNotificationDTO>,
    }

    impl APIResponse {
        pub fn new(notifications: Vec<ScheduledNotification>) -> Self {
            Self {
                notifications: notifications
                    .into_iter()
                    .map(ScheduledNotificationDTO::new)
                    .collect(),
            }
        }
    }
}

pub mod sync_all_schedules {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct APIResponse {
        pub synced: usize,
    }
}
