mod inmemory;
mod postgres;

pub use inmemory::InMemoryPushSubscriptionRepo;
pub use postgres::PostgresPushSubscriptionRepo;

use crate::repos::shared::repo::DeleteResult;
use chime_domain::PushSubscription;

#[async_trait::async_trait]
pub trait IPushSubscriptionRepo: Send + Sync {
    /// Insert, or refresh the key pair when the endpoint is already
    /// registered. Registration is idempotent by endpoint.
    async fn upsert(&self, subscription: &PushSubscription) -> anyhow::Result<()>;
    async fn find_all(&self) -> Vec<PushSubscription>;
    async fn delete_by_endpoint(&self, endpoint: &str) -> anyhow::Result<DeleteResult>;
}
