//! Push subscription and payload types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{DEFAULT_PUSH_BODY, DEFAULT_PUSH_TITLE};
use crate::errors::{Result, SpotSurferError};
use crate::impl_domain_status_conversions;

/// Notification permission as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    /// The user has not been asked yet.
    #[default]
    Default,
    Granted,
    Denied,
}

impl_domain_status_conversions!(NotificationPermission {
    Default => "default",
    Granted => "granted",
    Denied => "denied",
});

/// Key material the push server needs to encrypt messages for this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushKeys {
    pub p256dh: String,
    pub auth: String,
}

/// Platform-issued credential letting the remote server reach this
/// installation. The client only ever holds a read-only copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushSubscription {
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<i64>,
    pub keys: PushKeys,
}

/// Server → worker push payload. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PushPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PushPayload {
    /// Parse raw push bytes.
    ///
    /// An absent or blank payload is the empty payload. Anything that is not
    /// a JSON object yields `MalformedPushPayload`; callers recover with
    /// [`PushPayload::default`].
    pub fn parse(raw: Option<&[u8]>) -> Result<Self> {
        let Some(bytes) = raw else {
            return Ok(Self::default());
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes)
            .map_err(|e| SpotSurferError::MalformedPushPayload(e.to_string()))
    }

    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().filter(|t| !t.is_empty()).unwrap_or(DEFAULT_PUSH_TITLE)
    }

    pub fn body_or_default(&self) -> &str {
        self.body.as_deref().filter(|b| !b.is_empty()).unwrap_or(DEFAULT_PUSH_BODY)
    }

    /// Notification data: the payload's own fields over a default `url`.
    pub fn notification_data(&self, app_url: &str) -> Value {
        let mut data = self.extra.clone();
        if let Some(title) = &self.title {
            data.insert("title".into(), Value::String(title.clone()));
        }
        if let Some(body) = &self.body {
            data.insert("body".into(), Value::String(body.clone()));
        }
        let url = self.url.clone().unwrap_or_else(|| app_url.to_string());
        data.insert("url".into(), Value::String(url));
        Value::Object(data)
    }
}
