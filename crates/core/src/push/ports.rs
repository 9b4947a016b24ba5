//! Port interfaces for push subscriptions

use async_trait::async_trait;
use spotsurfer_domain::{NotificationPermission, PushSubscription, Result};

/// The platform push service.
#[async_trait]
pub trait PushService: Send + Sync {
    /// Current notification permission, without prompting.
    async fn permission(&self) -> NotificationPermission;

    /// Prompt the user for notification permission.
    async fn request_permission(&self) -> Result<NotificationPermission>;

    /// The subscription this installation already holds, if any.
    async fn existing_subscription(&self) -> Result<Option<PushSubscription>>;

    /// Create a new subscription. Fails with `PushServiceUnavailable`.
    async fn subscribe(&self) -> Result<PushSubscription>;
}

/// Remote server endpoint that stores subscriptions (`POST /subscribe`).
#[async_trait]
pub trait SubscriptionRegistrar: Send + Sync {
    async fn register(&self, subscription: &PushSubscription) -> Result<()>;
}
