use crate::shared::usecase::UseCase;
use chime_domain::PushPayload;
use chime_infra::{ChimeContext, StoreEvent};
use tracing::{debug, error};

/// One dispatch pass of the in-app delivery channel: deliver every unsent
/// schedule entry that is due and mark it sent. Runs on a fixed period
/// while the application is open, plus once at process start.
#[derive(Debug)]
pub struct DeliverDueNotificationsUseCase;

#[derive(Debug)]
pub struct DeliveryReport {
    /// Entries handed to the in-process notifier.
    pub delivered: usize,
    /// Orphaned entries reclaimed without a delivery attempt.
    pub reclaimed: usize,
}

#[derive(Debug)]
pub enum UseCaseError {}

#[async_trait::async_trait(?Send)]
impl UseCase for DeliverDueNotificationsUseCase {
    type Response = DeliveryReport;

    type Error = UseCaseError;

    const NAME: &'static str = "DeliverDueNotifications";

    async fn execute(&mut self, ctx: &ChimeContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let due = ctx.repos.scheduled_notifications.find_due_unsent(now).await;

        let mut delivered = 0;
        let mut reclaimed = 0;

        for notification in due {
            match ctx.repos.reminders.find(&notification.reminder_id).await {
                Some(reminder) if !reminder.is_deleted() => {
                    let payload =
                        PushPayload::for_due_reminder(&reminder, notification.pre_alert_minutes);
                    match ctx.services.notifier.notify(payload) {
                        Ok(()) => delivered += 1,
                        // A time-sensitive alert has no value once its moment
                        // has passed, so a failed attempt is not retried.
                        Err(e) => debug!(
                            "In-process delivery for reminder {} failed: {}",
                            reminder.id, e
                        ),
                    }
                }
                // Orphan: the reminder is gone, reclaim the entry silently.
                _ => reclaimed += 1,
            }

            if let Err(e) = ctx
                .repos
                .scheduled_notifications
                .mark_sent(&notification.id)
                .await
            {
                error!(
                    "Unable to mark notification {} as sent. Err: {:?}",
                    notification.id, e
                );
                continue;
            }
            ctx.bus.publish(StoreEvent::NotificationSent {
                notification_id: notification.id.clone(),
            });
        }

        Ok(DeliveryReport {
            delivered,
            reclaimed,
        })
    }
}
