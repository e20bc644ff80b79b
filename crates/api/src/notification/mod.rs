pub mod deliver_due_notifications;
pub mod send_push_notifications;
pub mod sync_all_reminder_notifications;
pub mod sync_reminder_notifications;

use actix_web::web;
use send_push_notifications::check_notifications_controller;
use sync_all_reminder_notifications::sync_all_schedules_controller;
use sync_reminder_notifications::sync_schedule_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Periodic trigger for the push fan-out pass.
    cfg.route(
        "/notifications/check",
        web::get().to(check_notifications_controller),
    );

    // Mutation hook for the reminder CRUD service and bulk recovery.
    cfg.route("/schedule/sync", web::post().to(sync_all_schedules_controller));
    cfg.route(
        "/schedule/sync/{reminder_id}",
        web::post().to(sync_schedule_controller),
    );
}
