use crate::notification::deliver_due_notifications::DeliverDueNotificationsUseCase;
use crate::notification::sync_all_reminder_notifications::SyncAllReminderNotificationsUseCase;
use crate::shared::usecase::execute;
use actix_web::rt::time::{interval, sleep};
use chime_infra::ChimeContext;
use std::time::Duration;

/// Period of the in-app dispatch pass.
const DISPATCH_INTERVAL_SECS: u64 = 60;

/// Period of the schedule top-up. Each reconciliation only materializes a
/// bounded number of occurrences, so reminders that are never edited need
/// their buffer refilled independently of mutations.
const TOP_UP_INTERVAL_SECS: u64 = 6 * 60 * 60;

pub fn get_start_delay(now_ts: usize, secs_before_min: usize) -> usize {
    let secs_to_next_minute = 60 - (now_ts / 1000) % 60;
    if secs_to_next_minute > secs_before_min {
        secs_to_next_minute - secs_before_min
    } else {
        secs_to_next_minute + (60 - secs_before_min)
    }
}

/// Minutely scan for due schedule entries delivered in-process. The first
/// pass runs right away so alerts that came due while the process was down
/// fire on boot; subsequent passes are aligned to minute boundaries.
pub fn start_notification_dispatch_job(ctx: ChimeContext) {
    actix_web::rt::spawn(async move {
        let _ = execute(DeliverDueNotificationsUseCase, &ctx).await;

        let now = ctx.sys.get_timestamp_millis();
        let secs_to_next_run = get_start_delay(now as usize, 0);
        sleep(Duration::from_secs(secs_to_next_run as u64)).await;

        let mut minutely_interval = interval(Duration::from_secs(DISPATCH_INTERVAL_SECS));
        loop {
            minutely_interval.tick().await;
            // Awaited so passes never overlap, even when one runs long.
            let _ = execute(DeliverDueNotificationsUseCase, &ctx).await;
        }
    });
}

/// Periodic full reconciliation. The first tick completes immediately, which
/// doubles as cold start recovery for schedules that were lost or never
/// created.
pub fn start_schedule_top_up_job(ctx: ChimeContext) {
    actix_web::rt::spawn(async move {
        let mut top_up_interval = interval(Duration::from_secs(TOP_UP_INTERVAL_SECS));
        loop {
            top_up_interval.tick().await;
            let _ = execute(SyncAllReminderNotificationsUseCase, &ctx).await;
        }
    });
}
