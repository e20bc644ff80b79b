use chime_domain::{PushPayload, PushSubscription};
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PushDeliveryError {
    /// The provider reported the endpoint permanently gone (404/410).
    /// Callers should drop the subscription.
    #[error("Push endpoint is permanently gone")]
    Gone,
    #[error("Push delivery failed: {0}")]
    Failed(String),
}

/// Boundary to the remote push provider. One call delivers one payload to
/// one endpoint; fan-out across endpoints is the caller's concern.
#[async_trait::async_trait]
pub trait IPushGateway: Send + Sync {
    async fn send(
        &self,
        subscription: &PushSubscription,
        payload: &PushPayload,
    ) -> Result<(), PushDeliveryError>;
}

pub struct WebPushGateway {
    client: reqwest::Client,
}

impl WebPushGateway {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for WebPushGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IPushGateway for WebPushGateway {
    async fn send(
        &self,
        subscription: &PushSubscription,
        payload: &PushPayload,
    ) -> Result<(), PushDeliveryError> {
        let res = self
            .client
            .post(&subscription.endpoint)
            .header("chime-push-p256dh", &subscription.p256dh)
            .header("chime-push-auth", &subscription.auth)
            .json(payload)
            .send()
            .await
            .map_err(|e| PushDeliveryError::Failed(e.to_string()))?;

        match res.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND | StatusCode::GONE => Err(PushDeliveryError::Gone),
            status => Err(PushDeliveryError::Failed(format!(
                "endpoint returned status {}",
                status
            ))),
        }
    }
}
