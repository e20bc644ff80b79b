use crate::error::ChimeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chime_api_structs::delete_subscription::{APIResponse, RequestBody};
use chime_infra::{ChimeContext, DeleteResult, StoreEvent};
use tracing::error;

pub async fn delete_subscription_controller(
    ctx: web::Data<ChimeContext>,
    body: web::Json<RequestBody>,
) -> Result<HttpResponse, ChimeError> {
    let usecase = DeleteSubscriptionUseCase {
        endpoint: body.endpoint.clone(),
    };

    // Unregistering an unknown endpoint is a success, not an error.
    execute(usecase, &ctx)
        .await
        .map(|_| HttpResponse::Ok().json(APIResponse { success: true }))
        .map_err(ChimeError::from)
}

#[derive(Debug)]
pub struct DeleteSubscriptionUseCase {
    pub endpoint: String,
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
impl UseCase for DeleteSubscriptionUseCase {
    type Response = DeleteResult;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteSubscription";

    async fn execute(&mut self, ctx: &ChimeContext) -> Result<Self::Response, Self::Error> {
        let res = ctx
            .repos
            .push_subscriptions
            .delete_by_endpoint(&self.endpoint)
            .await
            .map_err(|e| {
                error!(
                    "Unable to delete push subscription for endpoint {}. Err: {:?}",
                    self.endpoint, e
                );
                UseCaseError::StorageError
            })?;

        if res.deleted_count > 0 {
            ctx.bus.publish(StoreEvent::SubscriptionsChanged);
        }
        Ok(res)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chime_domain::PushSubscription;

    #[actix_web::main]
    #[test]
    async fn deletes_registered_endpoint_and_tolerates_unknown_ones() {
        let ctx = ChimeContext::create_inmemory();
        let endpoint = "https://push.example.com/send/abc";
        let subscription =
            PushSubscription::new(endpoint.to_string(), "p".into(), "a".into(), 0).unwrap();
        ctx.repos.push_subscriptions.upsert(&subscription).await.unwrap();

        let usecase = DeleteSubscriptionUseCase {
            endpoint: endpoint.to_string(),
        };
        let res = execute(usecase, &ctx).await.unwrap();
        assert_eq!(res.deleted_count, 1);
        assert!(ctx.repos.push_subscriptions.find_all().await.is_empty());

        let usecase = DeleteSubscriptionUseCase {
            endpoint: endpoint.to_string(),
        };
        let res = execute(usecase, &ctx).await.unwrap();
        assert_eq!(res.deleted_count, 0);
    }
}
