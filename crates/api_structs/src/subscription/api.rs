use crate::dtos::SubscriptionKeysDTO;
use serde::{Deserialize, Serialize};

pub mod create_subscription {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RequestBody {
        pub endpoint: String,
        pub keys: SubscriptionKeysDTO,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct APIResponse {
        pub success: bool,
    }
}

pub mod delete_subscription {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RequestBody {
        pub endpoint: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct APIResponse {
        pub success: bool,
    }
}
