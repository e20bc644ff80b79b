use crate::error::ChimeError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use chime_api_structs::sync_schedule::{APIResponse, PathParams};
use chime_domain::{ScheduledNotification, ID};
use chime_infra::{ChimeContext, StoreEvent};
use tracing::{error, warn};

/// How many upcoming occurrences are materialized per reconciliation. The
/// periodic top-up job re-runs reconciliation so the buffer refills for
/// reminders that are never edited.
pub const UPCOMING_OCCURRENCES: usize = 10;

pub async fn sync_schedule_controller(
    path: web::Path<PathParams>,
    ctx: web::Data<ChimeContext>,
) -> Result<HttpResponse, ChimeError> {
    let usecase = SyncReminderNotificationsUseCase {
        reminder_id: path.reminder_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|synced| HttpResponse::Ok().json(APIResponse::new(synced.notifications)))
        .map_err(ChimeError::from)
}

/// Regenerates the pending notification schedule for one reminder. This is
/// the single source of truth for "what notifications are pending": it is
/// invoked on every reminder mutation (create, edit, pause, resume, delete)
/// and is idempotent.
#[derive(Debug)]
pub struct SyncReminderNotificationsUseCase {
    pub reminder_id: ID,
}

#[derive(Debug)]
pub struct SyncedSchedule {
    pub reminder_id: ID,
    pub notifications: Vec<ScheduledNotification>,
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

/// Replace the unsent schedule entries for `reminder_id` with the set
/// derived from the reminder's current definition.
///
/// An inactive, soft-deleted or altogether missing reminder derives the
/// empty set, which clears its pending schedule. A malformed recurrence
/// rule derives the empty set as well instead of failing the call. Sent
/// entries are history and are never touched.
pub(crate) async fn sync_reminder_schedule(
    reminder_id: &ID,
    ctx: &ChimeContext,
) -> Result<Vec<ScheduledNotification>, UseCaseError> {
    let now = ctx.sys.get_timestamp_millis();

    let notifications = match ctx.repos.reminders.find(reminder_id).await {
        Some(reminder) if reminder.is_schedulable() => {
            let times = match reminder.notification_times(now, UPCOMING_OCCURRENCES) {
                Ok(times) => times,
                Err(e) => {
                    warn!(
                        "Scheduling no notifications for reminder {}: {}",
                        reminder.id, e
                    );
                    Vec::new()
                }
            };
            times
                .into_iter()
                .map(|time| {
                    ScheduledNotification::new(
                        reminder.id.clone(),
                        time.fires_at,
                        time.pre_alert_minutes,
                        now,
                    )
                })
                .collect()
        }
        _ => Vec::new(),
    };

    ctx.repos
        .scheduled_notifications
        .replace_unsent(reminder_id, &notifications)
        .await
        .map_err(|e| {
            error!(
                "Unable to replace schedule for reminder {}. Err: {:?}",
                reminder_id, e
            );
            UseCaseError::StorageError
        })?;

    Ok(notifications)
}

#[async_trait::async_trait(?Send)]
impl UseCase for SyncReminderNotificationsUseCase {
    type Response = SyncedSchedule;

    type Error = UseCaseError;

    const NAME: &'static str = "SyncReminderNotifications";

    async fn execute(&mut self, ctx: &ChimeContext) -> Result<Self::Response, Self::Error> {
        let notifications = sync_reminder_schedule(&self.reminder_id, ctx).await?;
        Ok(SyncedSchedule {
            reminder_id: self.reminder_id.clone(),
            notifications,
        })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SchedulePublisher)]
    }
}

/// Announces the regenerated schedule on the change bus so live views can
/// refresh without polling.
struct SchedulePublisher;

#[async_trait::async_trait(?Send)]
impl Subscriber<SyncReminderNotificationsUseCase> for SchedulePublisher {
    async fn notify(&self, e: &SyncedSchedule, ctx: &ChimeContext) {
        ctx.bus.publish(StoreEvent::ScheduleSynced {
            reminder_id: e.reminder_id.clone(),
        });
    }
}
