use super::sync_reminder_notifications::SyncReminderNotificationsUseCase;
use crate::error::ChimeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chime_api_structs::sync_all_schedules::APIResponse;
use chime_infra::ChimeContext;
use tracing::error;

pub async fn sync_all_schedules_controller(
    ctx: web::Data<ChimeContext>,
) -> Result<HttpResponse, ChimeError> {
    execute(SyncAllReminderNotificationsUseCase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse { synced: res.synced }))
        .map_err(ChimeError::from)
}

/// Reconciles the schedule of every non-deleted reminder. Used for bulk
/// recovery: on cold start and by the periodic top-up job, to repair drift
/// when entries were lost or a reminder's occurrence buffer has drained.
#[derive(Debug)]
pub struct SyncAllReminderNotificationsUseCase;

#[derive(Debug)]
pub struct SyncedAll {
    pub synced: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for ChimeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SyncAllReminderNotificationsUseCase {
    type Response = SyncedAll;

    type Error = UseCaseError;

    const NAME: &'static str = "SyncAllReminderNotifications";

    async fn execute(&mut self, ctx: &ChimeContext) -> Result<Self::Response, Self::Error> {
        let reminders = ctx.repos.reminders.find_all().await;

        let mut synced = 0;
        for reminder in reminders {
            let usecase = SyncReminderNotificationsUseCase {
                reminder_id: reminder.id.clone(),
            };
            // One broken reminder must not keep the rest from being synced.
            match execute(usecase, ctx).await {
                Ok(_) => synced += 1,
                Err(e) => error!(
                    "Unable to sync schedule for reminder {}. Err: {:?}",
                    reminder.id, e
                ),
            }
        }

        Ok(SyncedAll { synced })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chime_domain::Reminder;
    use chime_infra::{ISys, InMemoryReminderRepo};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    struct StaticTimeSys(i64);
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0
        }
    }

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .timestamp_millis()
    }

    fn setup_ctx(now: i64) -> (ChimeContext, Arc<InMemoryReminderRepo>) {
        let reminders = Arc::new(InMemoryReminderRepo::new());
        let mut ctx = ChimeContext::create_inmemory();
        ctx.repos.reminders = reminders.clone();
        ctx.sys = Arc::new(StaticTimeSys(now));
        (ctx, reminders)
    }

    fn reminder(anchor_ts: i64, active: bool) -> Reminder {
        Reminder {
            id: Default::default(),
            title: "Check the oven".to_string(),
            description: None,
            anchor_ts,
            recurrence: Some("FREQ=DAILY;INTERVAL=1".to_string()),
            pre_alerts: vec![0],
            active,
            timezone: chrono_tz::UTC,
            created_at: 0,
            updated_at: 0,
            deleted_at: None,
        }
    }

    #[actix_web::main]
    #[test]
    async fn syncs_every_non_deleted_reminder() {
        let anchor = ts(2024, 1, 1, 9, 0);
        let now = ts(2024, 1, 1, 8, 0);
        let (ctx, reminders) = setup_ctx(now);

        let active = reminder(anchor, true);
        let inactive = reminder(anchor, false);
        let mut deleted = reminder(anchor, true);
        deleted.deleted_at = Some(now);
        reminders.insert(&active);
        reminders.insert(&inactive);
        reminders.insert(&deleted);

        let res = execute(SyncAllReminderNotificationsUseCase, &ctx)
            .await
            .unwrap();

        // The deleted reminder is treated as absent entirely.
        assert_eq!(res.synced, 2);
        assert!(!ctx
            .repos
            .scheduled_notifications
            .find_unsent_by_reminder(&active.id)
            .await
            .is_empty());
        assert!(ctx
            .repos
            .scheduled_notifications
            .find_unsent_by_reminder(&inactive.id)
            .await
            .is_empty());
    }
}
