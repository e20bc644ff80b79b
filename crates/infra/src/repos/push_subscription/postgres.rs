use super::IPushSubscriptionRepo;
use crate::repos::shared::repo::DeleteResult;
use chime_domain::PushSubscription;
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresPushSubscriptionRepo {
    pool: PgPool,
}

impl PostgresPushSubscriptionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PushSubscriptionRaw {
    subscription_uid: Uuid,
    endpoint: String,
    p256dh: String,
    auth: String,
    created_at: i64,
}

impl Into<PushSubscription> for PushSubscriptionRaw {
    fn into(self) -> PushSubscription {
        PushSubscription {
            id: self.subscription_uid.into(),
            endpoint: self.endpoint,
            p256dh: self.p256dh,
            auth: self.auth,
            created_at: self.created_at,
        }
    }
}

#[async_trait::async_trait]
impl IPushSubscriptionRepo for PostgresPushSubscriptionRepo {
    async fn upsert(&self, subscription: &PushSubscription) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO push_subscriptions
            (subscription_uid, endpoint, p256dh, auth, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (endpoint) DO UPDATE
            SET p256dh = EXCLUDED.p256dh, auth = EXCLUDED.auth
            "#,
        )
        .bind(*subscription.id.inner_ref())
        .bind(&subscription.endpoint)
        .bind(&subscription.p256dh)
        .bind(&subscription.auth)
        .bind(subscription.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_all(&self) -> Vec<PushSubscription> {
        sqlx::query_as::<_, PushSubscriptionRaw>(
            r#"
            SELECT * FROM push_subscriptions
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!("Unable to list push subscriptions. Err: {:?}", e);
            Vec::new()
        })
        .into_iter()
        .map(|subscription| subscription.into())
        .collect()
    }

    async fn delete_by_endpoint(&self, endpoint: &str) -> anyhow::Result<DeleteResult> {
        let res = sqlx::query(
            r#"
            DELETE FROM push_subscriptions
            WHERE endpoint = $1
            "#,
        )
        .bind(endpoint)
        .execute(&self.pool)
        .await?;
        Ok(DeleteResult {
            deleted_count: res.rows_affected() as i64,
        })
    }
}
