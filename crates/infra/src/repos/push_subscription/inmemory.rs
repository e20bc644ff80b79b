use super::IPushSubscriptionRepo;
use crate::repos::shared::inmemory_repo::*;
use crate::repos::shared::repo::DeleteResult;
use chime_domain::PushSubscription;
use std::sync::Mutex;

pub struct InMemoryPushSubscriptionRepo {
    subscriptions: Mutex<Vec<PushSubscription>>,
}

impl InMemoryPushSubscriptionRepo {
    pub fn new() -> Self {
        Self {
            subscriptions: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryPushSubscriptionRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IPushSubscriptionRepo for InMemoryPushSubscriptionRepo {
    async fn upsert(&self, subscription: &PushSubscription) -> anyhow::Result<()> {
        delete_by(&self.subscriptions, |s: &PushSubscription| {
            s.endpoint == subscription.endpoint
        });
        insert(subscription, &self.subscriptions);
        Ok(())
    }

    async fn find_all(&self) -> Vec<PushSubscription> {
        find_by(&self.subscriptions, |_| true)
    }

    async fn delete_by_endpoint(&self, endpoint: &str) -> anyhow::Result<DeleteResult> {
        Ok(delete_by(&self.subscriptions, |s: &PushSubscription| {
            s.endpoint == endpoint
        }))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn subscription(endpoint: &str) -> PushSubscription {
        PushSubscription::new(endpoint.to_string(), "p".into(), "a".into(), 0)
            .expect("valid endpoint")
    }

    #[tokio::test]
    async fn upsert_is_idempotent_by_endpoint() {
        let repo = InMemoryPushSubscriptionRepo::new();
        let endpoint = "https://push.example.com/send/1";

        repo.upsert(&subscription(endpoint)).await.unwrap();
        repo.upsert(&subscription(endpoint)).await.unwrap();

        assert_eq!(repo.find_all().await.len(), 1);
    }

    #[tokio::test]
    async fn deletes_by_endpoint() {
        let repo = InMemoryPushSubscriptionRepo::new();
        repo.upsert(&subscription("https://push.example.com/send/1"))
            .await
            .unwrap();
        repo.upsert(&subscription("https://push.example.com/send/2"))
            .await
            .unwrap();

        let res = repo
            .delete_by_endpoint("https://push.example.com/send/1")
            .await
            .unwrap();
        assert_eq!(res.deleted_count, 1);
        assert_eq!(repo.find_all().await.len(), 1);
    }
}
