//! Foreground ↔ worker message contract
//!
//! This is the only state shared between the two contexts. Neither side may
//! assume anything about the other's memory; every change travels as one of
//! these messages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::notification::{NotificationOptions, NotificationRequest};
use crate::errors::{Result, SpotSurferError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum WorkerMessage {
    StartTracking,
    StopTracking,
    /// Legacy manual notification.
    Notification { title: String, body: String },
    ShowNotification {
        title: String,
        #[serde(default)]
        options: NotificationOptions,
    },
    /// Best-effort: the pending timer does not survive worker eviction.
    DelayedNotification {
        title: String,
        #[serde(default)]
        options: NotificationOptions,
        #[serde(rename = "delay")]
        delay_ms: u64,
    },
    /// Worker → foreground: the user interacted with a notification.
    NotificationClicked {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        action: Option<String>,
        #[serde(default, skip_serializing_if = "Value::is_null")]
        data: Value,
    },
}

impl WorkerMessage {
    /// Wrap a request as a `show-notification` message.
    pub fn show(request: NotificationRequest) -> Self {
        let (title, options) = request.into_options();
        Self::ShowNotification { title, options }
    }

    /// Wrap a request as a `delayed-notification` message.
    pub fn delayed(request: NotificationRequest, delay_ms: u64) -> Self {
        let (title, options) = request.into_options();
        Self::DelayedNotification { title, options, delay_ms }
    }

    /// Wire name of the message kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StartTracking => "start-tracking",
            Self::StopTracking => "stop-tracking",
            Self::Notification { .. } => "notification",
            Self::ShowNotification { .. } => "show-notification",
            Self::DelayedNotification { .. } => "delayed-notification",
            Self::NotificationClicked { .. } => "notification-clicked",
        }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| SpotSurferError::InvalidInput(format!("invalid worker message: {e}")))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| SpotSurferError::Internal(format!("failed to encode worker message: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::notification::NotificationPreset;

    #[test]
    fn unit_messages_are_bare_type_tags() {
        assert_eq!(
            serde_json::to_value(WorkerMessage::StartTracking).unwrap(),
            json!({ "type": "start-tracking" })
        );
        assert_eq!(
            WorkerMessage::from_json(r#"{"type":"stop-tracking"}"#).unwrap(),
            WorkerMessage::StopTracking
        );
    }

    #[test]
    fn parses_show_notification_with_partial_options() {
        let message = WorkerMessage::from_json(
            r#"{"type":"show-notification","title":"Parking","options":{"body":"Lot A","icon":"/i.png"}}"#,
        )
        .unwrap();

        match message {
            WorkerMessage::ShowNotification { title, options } => {
                assert_eq!(title, "Parking");
                assert_eq!(options.body, "Lot A");
                assert_eq!(options.icon.as_deref(), Some("/i.png"));
                assert!(!options.require_interaction);
            }
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn delayed_notification_uses_delay_field() {
        let message = WorkerMessage::from_json(
            r#"{"type":"delayed-notification","title":"Reminder","options":{},"delay":1500}"#,
        )
        .unwrap();
        assert!(matches!(message, WorkerMessage::DelayedNotification { delay_ms: 1500, .. }));

        let encoded = serde_json::to_value(&message).unwrap();
        assert_eq!(encoded["delay"], 1500);
    }

    #[test]
    fn unknown_kind_is_invalid_input() {
        let err = WorkerMessage::from_json(r#"{"type":"self-destruct"}"#).unwrap_err();
        assert!(matches!(err, SpotSurferError::InvalidInput(_)));
    }

    #[test]
    fn show_wraps_request_options() {
        let request = NotificationRequest::preset(NotificationPreset::WelcomeBack);
        let message = WorkerMessage::show(request.clone());
        assert_eq!(message.kind(), "show-notification");

        let WorkerMessage::ShowNotification { title, options } = message else {
            panic!("expected show-notification");
        };
        assert_eq!(NotificationRequest::from_options(title, options), request);
    }
}
