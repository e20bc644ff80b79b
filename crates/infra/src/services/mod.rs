mod notifier;
mod push_gateway;

pub use notifier::{ChannelNotifier, INotifier};
pub use push_gateway::{IPushGateway, PushDeliveryError, WebPushGateway};

use std::sync::Arc;

/// Delivery services injected into the context. Tests swap these for stubs.
#[derive(Clone)]
pub struct Services {
    /// In-process delivery surface used while the application is open.
    pub notifier: Arc<dyn INotifier>,
    /// Remote push delivery used when it is not.
    pub push: Arc<dyn IPushGateway>,
}

impl Services {
    pub fn production() -> Self {
        Self {
            notifier: Arc::new(ChannelNotifier::new()),
            push: Arc::new(WebPushGateway::new()),
        }
    }
}
