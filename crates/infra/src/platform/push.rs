//! Local push service
//!
//! Issues subscriptions under a configured endpoint prefix with freshly
//! generated key material. Permission prompts resolve to a preset answer.

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::RngCore;
use spotsurfer_core::PushService;
use spotsurfer_domain::{
    NotificationPermission, PushConfig, PushKeys, PushSubscription, Result, SpotSurferError,
};
use tracing::info;
use uuid::Uuid;

/// Uncompressed P-256 public key length.
const P256DH_LEN: usize = 65;
const AUTH_SECRET_LEN: usize = 16;

struct PushState {
    permission: NotificationPermission,
    subscription: Option<PushSubscription>,
}

pub struct LocalPushService {
    endpoint_base: String,
    prompt_answer: NotificationPermission,
    state: Mutex<PushState>,
}

impl LocalPushService {
    pub fn new(config: &PushConfig) -> Self {
        Self {
            endpoint_base: config.endpoint_base.trim_end_matches('/').to_string(),
            prompt_answer: NotificationPermission::Granted,
            state: Mutex::new(PushState {
                permission: NotificationPermission::Default,
                subscription: None,
            }),
        }
    }

    /// What the user answers when prompted.
    pub fn with_prompt_answer(mut self, answer: NotificationPermission) -> Self {
        self.prompt_answer = answer;
        self
    }
}

fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[async_trait]
impl PushService for LocalPushService {
    async fn permission(&self) -> NotificationPermission {
        self.state.lock().permission
    }

    async fn request_permission(&self) -> Result<NotificationPermission> {
        let mut state = self.state.lock();
        if state.permission == NotificationPermission::Default {
            state.permission = self.prompt_answer;
            info!(permission = %state.permission, "notification permission answered");
        }
        Ok(state.permission)
    }

    async fn existing_subscription(&self) -> Result<Option<PushSubscription>> {
        Ok(self.state.lock().subscription.clone())
    }

    async fn subscribe(&self) -> Result<PushSubscription> {
        if self.endpoint_base.is_empty() {
            return Err(SpotSurferError::PushServiceUnavailable(
                "no push endpoint configured".into(),
            ));
        }
        let subscription = PushSubscription {
            endpoint: format!("{}/{}", self.endpoint_base, Uuid::new_v4()),
            expiration_time: None,
            keys: PushKeys { p256dh: random_hex(P256DH_LEN), auth: random_hex(AUTH_SECRET_LEN) },
        };
        self.state.lock().subscription = Some(subscription.clone());
        info!(endpoint = %subscription.endpoint, "push subscription issued");
        Ok(subscription)
    }
}
