use crate::error::ChimeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chime_api_structs::create_subscription::{APIResponse, RequestBody};
use chime_domain::{InvalidEndpointError, PushSubscription};
use chime_infra::{ChimeContext, StoreEvent};
use tracing::error;

pub async fn create_subscription_controller(
    ctx: web::Data<ChimeContext>,
    body: web::Json<RequestBody>,
) -> Result<HttpResponse, ChimeError> {
    let usecase = CreateSubscriptionUseCase {
        endpoint: body.endpoint.clone(),
        p256dh: body.keys.p256dh.clone(),
        auth: body.keys.auth.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|_| HttpResponse::Ok().json(APIResponse { success: true }))
        .map_err(ChimeError::from)
}

/// Registers a push delivery endpoint. Re-registering an endpoint refreshes
/// its key pair instead of duplicating it.
#[derive(Debug)]
pub struct CreateSubscriptionUseCase {
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidEndpoint(InvalidEndpointError),
    StorageError,
}

impl From<UseCaseError> for ChimeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidEndpoint(err) => Self::BadClientData(format!(
                "Invalid push endpoint provided. Error message: {}",
                err
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateSubscriptionUseCase {
    type Response = PushSubscription;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateSubscription";

    async fn execute(&mut self, ctx: &ChimeContext) -> Result<Self::Response, Self::Error> {
        let subscription = PushSubscription::new(
            self.endpoint.clone(),
            self.p256dh.clone(),
            self.auth.clone(),
            ctx.sys.get_timestamp_millis(),
        )
        .map_err(UseCaseError::InvalidEndpoint)?;

        ctx.repos
            .push_subscriptions
            .upsert(&subscription)
            .await
            .map_err(|e| {
                error!(
                    "Unable to store push subscription for endpoint {}. Err: {:?}",
                    subscription.endpoint, e
                );
                UseCaseError::StorageError
            })?;

        ctx.bus.publish(StoreEvent::SubscriptionsChanged);
        Ok(subscription)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn usecase(endpoint: &str) -> CreateSubscriptionUseCase {
        CreateSubscriptionUseCase {
            endpoint: endpoint.to_string(),
            p256dh: "p256dh-key".to_string(),
            auth: "auth-key".to_string(),
        }
    }

    #[actix_web::main]
    #[test]
    async fn registering_twice_keeps_a_single_subscription() {
        let ctx = ChimeContext::create_inmemory();
        let endpoint = "https://push.example.com/send/abc";

        execute(usecase(endpoint), &ctx).await.unwrap();
        execute(usecase(endpoint), &ctx).await.unwrap();

        let all = ctx.repos.push_subscriptions.find_all().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].endpoint, endpoint);
    }

    #[actix_web::main]
    #[test]
    async fn rejects_invalid_endpoints() {
        let ctx = ChimeContext::create_inmemory();

        assert!(execute(usecase("http://insecure.example.com/x"), &ctx)
            .await
            .is_err());
        assert!(execute(usecase("not a url"), &ctx).await.is_err());
        assert!(ctx.repos.push_subscriptions.find_all().await.is_empty());
    }
}
