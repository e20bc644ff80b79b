use crate::shared::entity::{Entity, ID};
use thiserror::Error;

/// A registered push delivery endpoint. Rows are created by the subscribe
/// boundary, removed on unsubscribe or when the push provider reports the
/// endpoint permanently gone.
#[derive(Debug, Clone, PartialEq)]
pub struct PushSubscription {
    pub id: ID,
    /// Provider-issued delivery URL, unique per subscription.
    pub endpoint: String,
    /// Opaque key pair handed to the delivery transport.
    pub p256dh: String,
    pub auth: String,
    pub created_at: i64,
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidEndpointError {
    #[error("Malformed endpoint url: {0}")]
    Malformed(String),
    #[error("Endpoint scheme must be https: {0}")]
    InsecureScheme(String),
}

impl PushSubscription {
    pub fn new(
        endpoint: String,
        p256dh: String,
        auth: String,
        created_at: i64,
    ) -> Result<Self, InvalidEndpointError> {
        let parsed = url::Url::parse(&endpoint)
            .map_err(|_| InvalidEndpointError::Malformed(endpoint.clone()))?;
        if parsed.scheme() != "https" {
            return Err(InvalidEndpointError::InsecureScheme(endpoint));
        }

        Ok(Self {
            id: ID::new(),
            endpoint,
            p256dh,
            auth,
            created_at,
        })
    }
}

impl Entity for PushSubscription {
    fn id(&self) -> &ID {
        &self.id
    }
}
