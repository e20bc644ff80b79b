use serde::{Deserialize, Serialize};

/// Key pair handed over by the browser's push registration flow.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SubscriptionKeysDTO {
    pub p256dh: String,
    pub auth: String,
}
