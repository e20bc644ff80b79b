use crate::error::ChimeError;
use crate::shared::auth::protect_trigger_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use chime_api_structs::check_notifications::APIResponse;
use chime_domain::PushPayload;
use chime_infra::{ChimeContext, PushDeliveryError, StoreEvent};
use chrono::{SecondsFormat, TimeZone, Utc};
use tracing::{debug, error};

pub async fn check_notifications_controller(
    http_req: HttpRequest,
    ctx: web::Data<ChimeContext>,
) -> Result<HttpResponse, ChimeError> {
    protect_trigger_route(&http_req, &ctx)?;

    execute(SendPushNotificationsUseCase, &ctx)
        .await
        .map(|report| {
            let now = ctx.sys.get_timestamp_millis();
            let timestamp = Utc
                .timestamp_millis_opt(now)
                .single()
                .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
                .unwrap_or_default();
            HttpResponse::Ok().json(APIResponse {
                checked: report.checked,
                sent: report.sent,
                timestamp,
            })
        })
        .map_err(ChimeError::from)
}

/// One fan-out pass of the push delivery channel, driven by the external
/// periodic trigger: broadcast every due schedule entry to every registered
/// subscription, prune endpoints the provider reports permanently gone and
/// mark the entries sent.
#[derive(Debug)]
pub struct SendPushNotificationsUseCase;

#[derive(Debug)]
pub struct PushFanoutReport {
    /// Due entries examined this pass.
    pub checked: usize,
    /// Successful endpoint deliveries across all entries.
    pub sent: usize,
    /// Failed endpoint deliveries across all entries.
    pub failed: usize,
}

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for ChimeError {
    fn from(e: UseCaseError) -> Self {
        match e {}
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendPushNotificationsUseCase {
    type Response = PushFanoutReport;

    type Error = UseCaseError;

    const NAME: &'static str = "SendPushNotifications";

    async fn execute(&mut self, ctx: &ChimeContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let due = ctx.repos.scheduled_notifications.find_due_unsent(now).await;
        let subscriptions = ctx.repos.push_subscriptions.find_all().await;

        let mut sent = 0;
        let mut failed = 0;
        // Endpoints reported gone are only deleted once the whole pass is
        // done, so a dead endpoint cannot affect iteration over the others.
        let mut gone: Vec<String> = Vec::new();

        for notification in &due {
            let reminder = match ctx.repos.reminders.find(&notification.reminder_id).await {
                Some(reminder) if !reminder.is_deleted() => reminder,
                // Orphan: reclaim without bothering any endpoint.
                _ => {
                    self.mark_sent(notification.id.clone(), ctx).await;
                    continue;
                }
            };

            let payload = PushPayload::for_due_reminder(&reminder, notification.pre_alert_minutes);

            for subscription in &subscriptions {
                match ctx.services.push.send(subscription, &payload).await {
                    Ok(()) => sent += 1,
                    Err(PushDeliveryError::Gone) => {
                        failed += 1;
                        if !gone.contains(&subscription.endpoint) {
                            gone.push(subscription.endpoint.clone());
                        }
                    }
                    Err(e) => {
                        failed += 1;
                        debug!(
                            "Push delivery to {} failed: {}",
                            subscription.endpoint, e
                        );
                    }
                }
            }

            // Partial delivery still counts as handled; a missed alert is
            // not worth re-sending after its moment has passed.
            self.mark_sent(notification.id.clone(), ctx).await;
        }

        for endpoint in gone {
            match ctx.repos.push_subscriptions.delete_by_endpoint(&endpoint).await {
                Ok(_) => ctx.bus.publish(StoreEvent::SubscriptionsChanged),
                Err(e) => error!(
                    "Unable to delete gone push subscription {}. Err: {:?}",
                    endpoint, e
                ),
            }
        }

        Ok(PushFanoutReport {
            checked: due.len(),
            sent,
            failed,
        })
    }
}

impl SendPushNotificationsUseCase {
    async fn mark_sent(&self, notification_id: chime_domain::ID, ctx: &ChimeContext) {
        if let Err(e) = ctx
            .repos
            .scheduled_notifications
            .mark_sent(&notification_id)
            .await
        {
            error!(
                "Unable to mark notification {} as sent. Err: {:?}",
                notification_id, e
            );
            return;
        }
        ctx.bus
            .publish(StoreEvent::NotificationSent { notification_id });
    }
}
