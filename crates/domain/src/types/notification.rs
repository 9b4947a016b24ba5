//! Notification requests and the presets used by every call site
//!
//! A [`NotificationRequest`] is ephemeral: it is built per event, handed to a
//! channel and never persisted. [`NotificationOptions`] is the wire shape
//! carried by `show-notification` / `delayed-notification` messages.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::push::PushPayload;
use crate::constants::{
    ACTION_STOP, ACTION_STOP_LABEL, ACTION_VIEW, ACTION_VIEW_LABEL, DEFAULT_APP_URL, DEFAULT_ICON,
    TAG_MANUAL_NOTIFICATION, TAG_PUSH_NOTIFICATION, TAG_TRIP_TRACKING,
};

/// A button shown on a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    #[serde(rename = "action")]
    pub id: String,
    #[serde(rename = "title")]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl NotificationAction {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self { id: id.into(), label: label.into(), icon: None }
    }

    /// `stop`: ends tracking from the notification itself.
    pub fn stop() -> Self {
        Self { icon: Some(DEFAULT_ICON.to_string()), ..Self::new(ACTION_STOP, ACTION_STOP_LABEL) }
    }

    /// `view`: focuses or opens the app.
    pub fn view() -> Self {
        Self { icon: Some(DEFAULT_ICON.to_string()), ..Self::new(ACTION_VIEW, ACTION_VIEW_LABEL) }
    }
}

/// Presentation options as they travel over the worker channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationOptions {
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub require_interaction: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<NotificationAction>,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

/// A request to present one notification to the user now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    /// Dedup key; a newer notification with the same tag replaces the older.
    pub tag: String,
    pub require_interaction: bool,
    pub actions: Vec<NotificationAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

/// Named notification shapes, selected by call site.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationPreset {
    TripStarted,
    DestinationReached,
    WelcomeBack,
    /// One-off background sync reminder.
    StillTracking,
    /// Periodic background sync reminder.
    TrackingActive,
    Push { payload: PushPayload, app_url: String },
    Manual { title: String, body: String },
}

impl NotificationRequest {
    pub fn builder(title: impl Into<String>) -> NotificationBuilder {
        NotificationBuilder::new(title)
    }

    pub fn preset(preset: NotificationPreset) -> Self {
        match preset {
            NotificationPreset::TripStarted => trip("🚗 Trip Started")
                .body("Tracking your trip. We'll let you know when you reach your destination.")
                .action(NotificationAction::stop())
                .action(NotificationAction::view())
                .build(),
            NotificationPreset::DestinationReached => trip("📍 Destination Reached")
                .body("You've arrived in the destination zone. Enjoy your visit!")
                .action(NotificationAction::stop())
                .action(NotificationAction::view())
                .build(),
            NotificationPreset::WelcomeBack => trip("🏠 Welcome Back")
                .body("You're back where your trip started. Tracking has stopped.")
                .action(NotificationAction::view())
                .build(),
            NotificationPreset::StillTracking => trip("📍 Trip Update")
                .body("Your trip is still being tracked.")
                .action(NotificationAction::stop())
                .build(),
            NotificationPreset::TrackingActive => trip("📡 Tracking Active")
                .body("Your location is still updating in the background.")
                .action(NotificationAction::stop())
                .build(),
            NotificationPreset::Push { payload, app_url } => {
                let title = payload.title_or_default().to_string();
                let body = payload.body_or_default().to_string();
                let data = payload.notification_data(&app_url);
                Self::builder(title)
                    .body(body)
                    .icon(DEFAULT_ICON)
                    .badge(DEFAULT_ICON)
                    .tag(TAG_PUSH_NOTIFICATION)
                    .require_interaction(true)
                    .data(data)
                    .action(NotificationAction::stop())
                    .action(NotificationAction::view())
                    .build()
            }
            NotificationPreset::Manual { title, body } => Self::builder(title)
                .body(body)
                .icon(DEFAULT_ICON)
                .badge(DEFAULT_ICON)
                .tag(TAG_MANUAL_NOTIFICATION)
                .require_interaction(true)
                .data(json!({ "type": "manual" }))
                .build(),
        }
    }

    /// Build a request from a title and wire options. A missing tag falls
    /// back to the manual tag.
    pub fn from_options(title: impl Into<String>, options: NotificationOptions) -> Self {
        Self {
            title: title.into(),
            body: options.body,
            tag: options.tag.unwrap_or_else(|| TAG_MANUAL_NOTIFICATION.to_string()),
            require_interaction: options.require_interaction,
            actions: dedup_actions(options.actions),
            icon: options.icon,
            badge: options.badge,
            data: options.data,
        }
    }

    /// Split into title and wire options.
    pub fn into_options(self) -> (String, NotificationOptions) {
        let options = NotificationOptions {
            body: self.body,
            icon: self.icon,
            badge: self.badge,
            tag: Some(self.tag),
            require_interaction: self.require_interaction,
            actions: self.actions,
            data: self.data,
        };
        (self.title, options)
    }

    pub fn is_trip_tracking(&self) -> bool {
        self.tag == TAG_TRIP_TRACKING
    }

    /// URL to open when the notification is clicked, if it carries one.
    pub fn target_url(&self) -> Option<&str> {
        self.data.get("url").and_then(Value::as_str)
    }
}

fn trip(title: &str) -> NotificationBuilder {
    NotificationRequest::builder(title)
        .icon(DEFAULT_ICON)
        .badge(DEFAULT_ICON)
        .tag(TAG_TRIP_TRACKING)
        .require_interaction(true)
        .data(json!({ "type": "trip", "url": DEFAULT_APP_URL }))
}

fn dedup_actions(actions: Vec<NotificationAction>) -> Vec<NotificationAction> {
    let mut unique: Vec<NotificationAction> = Vec::with_capacity(actions.len());
    for action in actions {
        if !unique.iter().any(|existing| existing.id == action.id) {
            unique.push(action);
        }
    }
    unique
}

/// Builder for [`NotificationRequest`].
#[derive(Debug, Clone)]
pub struct NotificationBuilder {
    request: NotificationRequest,
}

impl NotificationBuilder {
    fn new(title: impl Into<String>) -> Self {
        Self {
            request: NotificationRequest {
                title: title.into(),
                body: String::new(),
                tag: TAG_MANUAL_NOTIFICATION.to_string(),
                require_interaction: false,
                actions: Vec::new(),
                icon: None,
                badge: None,
                data: Value::Null,
            },
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.request.body = body.into();
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.request.tag = tag.into();
        self
    }

    pub fn require_interaction(mut self, required: bool) -> Self {
        self.request.require_interaction = required;
        self
    }

    /// Add an action; a second action with the same id is ignored.
    pub fn action(mut self, action: NotificationAction) -> Self {
        if !self.request.actions.iter().any(|existing| existing.id == action.id) {
            self.request.actions.push(action);
        }
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.request.icon = Some(icon.into());
        self
    }

    pub fn badge(mut self, badge: impl Into<String>) -> Self {
        self.request.badge = Some(badge.into());
        self
    }

    pub fn data(mut self, data: Value) -> Self {
        self.request.data = data;
        self
    }

    pub fn build(self) -> NotificationRequest {
        self.request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_PUSH_BODY, DEFAULT_PUSH_TITLE};

    #[test]
    fn trip_presets_share_the_trip_tag() {
        for preset in [
            NotificationPreset::TripStarted,
            NotificationPreset::DestinationReached,
            NotificationPreset::WelcomeBack,
            NotificationPreset::StillTracking,
            NotificationPreset::TrackingActive,
        ] {
            let request = NotificationRequest::preset(preset);
            assert!(request.is_trip_tracking(), "{} should be trip-tagged", request.title);
            assert!(request.require_interaction);
        }
    }

    #[test]
    fn push_preset_falls_back_to_defaults() {
        let request = NotificationRequest::preset(NotificationPreset::Push {
            payload: PushPayload::default(),
            app_url: "/".into(),
        });

        assert_eq!(request.title, DEFAULT_PUSH_TITLE);
        assert_eq!(request.body, DEFAULT_PUSH_BODY);
        assert_eq!(request.tag, TAG_PUSH_NOTIFICATION);
        let ids: Vec<_> = request.actions.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec![ACTION_STOP, ACTION_VIEW]);
        assert_eq!(request.target_url(), Some("/"));
    }

    #[test]
    fn manual_preset_carries_manual_marker() {
        let request = NotificationRequest::preset(NotificationPreset::Manual {
            title: "Heads up".into(),
            body: "Lot B is full".into(),
        });
        assert_eq!(request.tag, TAG_MANUAL_NOTIFICATION);
        assert_eq!(request.data["type"], "manual");
        assert!(request.actions.is_empty());
    }

    #[test]
    fn builder_ignores_duplicate_actions() {
        let request = NotificationRequest::builder("t")
            .action(NotificationAction::stop())
            .action(NotificationAction::new(ACTION_STOP, "Stop again"))
            .build();
        assert_eq!(request.actions.len(), 1);
        assert_eq!(request.actions[0].label, ACTION_STOP_LABEL);
    }

    #[test]
    fn options_without_tag_default_to_manual() {
        let options: NotificationOptions =
            serde_json::from_str(r#"{"body":"hello","requireInteraction":true}"#).unwrap();
        let request = NotificationRequest::from_options("Title", options);
        assert_eq!(request.tag, TAG_MANUAL_NOTIFICATION);
        assert!(request.require_interaction);
        assert_eq!(request.body, "hello");
    }

    #[test]
    fn actions_use_platform_field_names() {
        let json = serde_json::to_value(NotificationAction::view()).unwrap();
        assert_eq!(json["action"], ACTION_VIEW);
        assert_eq!(json["title"], ACTION_VIEW_LABEL);
    }

    #[test]
    fn into_options_keeps_tag_and_actions() {
        let request = NotificationRequest::preset(NotificationPreset::DestinationReached);
        let (title, options) = request.clone().into_options();
        assert_eq!(NotificationRequest::from_options(title, options), request);
    }
}
