//! Push subscription manager
//!
//! Check-then-create under one lock: concurrent or repeated callers share a
//! single platform subscription. Registration with the remote server is
//! best-effort and never retried in the background.

use std::sync::Arc;

use spotsurfer_domain::{NotificationPermission, PushSubscription, Result, SpotSurferError};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::ports::{PushService, SubscriptionRegistrar};

#[derive(Debug, Default)]
struct ManagerState {
    subscription: Option<PushSubscription>,
    registered: bool,
}

/// Owns this installation's read-only copy of its push subscription.
pub struct PushSubscriptionManager {
    service: Arc<dyn PushService>,
    registrar: Arc<dyn SubscriptionRegistrar>,
    state: Mutex<ManagerState>,
}

impl PushSubscriptionManager {
    pub fn new(service: Arc<dyn PushService>, registrar: Arc<dyn SubscriptionRegistrar>) -> Self {
        Self { service, registrar, state: Mutex::new(ManagerState::default()) }
    }

    /// The locally held subscription, if one has been obtained.
    pub async fn current(&self) -> Option<PushSubscription> {
        self.state.lock().await.subscription.clone()
    }

    /// Whether the held subscription has reached the remote server.
    pub async fn is_registered(&self) -> bool {
        self.state.lock().await.registered
    }

    /// Return a live subscription, creating one only if none exists.
    ///
    /// # Errors
    /// - `PermissionDenied` when the user refuses notifications
    /// - `PushServiceUnavailable` when the platform cannot subscribe
    /// - the registrar's error when `POST /subscribe` fails; the subscription
    ///   is still kept locally and reused by the next call
    pub async fn ensure_subscription(&self) -> Result<PushSubscription> {
        let mut state = self.state.lock().await;

        let subscription = match state.subscription.clone() {
            Some(held) => held,
            None => {
                let obtained = self.obtain().await?;
                state.subscription = Some(obtained.clone());
                obtained
            }
        };

        if !state.registered {
            if let Err(err) = self.registrar.register(&subscription).await {
                warn!(
                    error = %err,
                    endpoint = %subscription.endpoint,
                    "subscription registration failed"
                );
                return Err(err);
            }
            state.registered = true;
            info!(endpoint = %subscription.endpoint, "push subscription registered");
        }

        Ok(subscription)
    }

    async fn obtain(&self) -> Result<PushSubscription> {
        if let Some(existing) = self.service.existing_subscription().await? {
            debug!(endpoint = %existing.endpoint, "reusing existing push subscription");
            return Ok(existing);
        }

        let permission = match self.service.permission().await {
            NotificationPermission::Granted => NotificationPermission::Granted,
            NotificationPermission::Denied => NotificationPermission::Denied,
            NotificationPermission::Default => self.service.request_permission().await?,
        };
        if permission != NotificationPermission::Granted {
            return Err(SpotSurferError::PermissionDenied(format!(
                "notification permission is {permission}"
            )));
        }

        let created = self.service.subscribe().await?;
        info!(endpoint = %created.endpoint, "created push subscription");
        Ok(created)
    }
}
