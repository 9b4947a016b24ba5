//! Background worker event handler
//!
//! [`BackgroundWorker::handle`] maps one event to the effects it requires.
//! It never fails: anything unusable degrades to a default notification or
//! to no effect at all.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use spotsurfer_domain::constants::{ACTION_STOP, SYNC_TAG_TRACKING};
use spotsurfer_domain::{
    NotificationConfig, NotificationPreset, NotificationRequest, PushPayload, WorkerMessage,
};
use tracing::{debug, info, warn};
use url::Url;

use super::ports::{ClientInfo, ClientKind};

/// Worker-local state. Independent of the foreground session; the two only
/// meet through [`WorkerMessage`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerState {
    pub tracking_active: bool,
}

/// Everything that can wake the worker.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent {
    Install,
    Activate,
    Message(WorkerMessage),
    Push { payload: Option<Vec<u8>> },
    Sync { tag: String, periodic: bool },
    NotificationClick { action: Option<String>, notification: NotificationRequest },
    /// A delay scheduled by `delayed-notification` has elapsed.
    TimerFired { request: NotificationRequest },
}

impl WorkerEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Activate => "activate",
            Self::Message(message) => message.kind(),
            Self::Push { .. } => "push",
            Self::Sync { periodic: false, .. } => "sync",
            Self::Sync { periodic: true, .. } => "periodic-sync",
            Self::NotificationClick { .. } => "notification-click",
            Self::TimerFired { .. } => "timer-fired",
        }
    }
}

/// A side effect the runtime must carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEffect {
    Present(NotificationRequest),
    /// Present after `delay`. Not persisted; lost if the worker is evicted.
    Schedule { request: NotificationRequest, delay: Duration },
    Close { tag: String },
    /// Send to every client, controlled or not.
    Broadcast(WorkerMessage),
    FocusOrOpen { url: String },
    Persist(WorkerState),
    SkipWaiting,
    ClaimClients,
}

/// Event handler for the background context. Pure: callers carry out the
/// returned effects.
#[derive(Debug, Clone)]
pub struct BackgroundWorker {
    state: WorkerState,
    app_url: String,
    icon: String,
}

impl BackgroundWorker {
    /// Fresh worker with tracking inactive.
    pub fn new(config: &NotificationConfig) -> Self {
        Self { state: WorkerState::default(), app_url: config.app_url.clone(), icon: config.icon.clone() }
    }

    /// Resume from persisted state.
    pub fn with_state(mut self, state: WorkerState) -> Self {
        self.state = state;
        self
    }

    /// Snapshot of the state to persist.
    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Whether a trip is being tracked, as last reported by a client.
    pub fn is_tracking_active(&self) -> bool {
        self.state.tracking_active
    }

    /// Page opened when no client can be focused.
    pub fn app_url(&self) -> &str {
        &self.app_url
    }

    /// Apply one event and list the effects it calls for, in order.
    pub fn handle(&mut self, event: WorkerEvent) -> Vec<WorkerEffect> {
        debug!(event = event.kind(), tracking_active = self.state.tracking_active, "worker event");

        match event {
            WorkerEvent::Install => vec![WorkerEffect::SkipWaiting],
            WorkerEvent::Activate => vec![WorkerEffect::ClaimClients],
            WorkerEvent::Message(message) => self.on_message(message),
            WorkerEvent::Push { payload } => self.on_push(payload.as_deref()),
            WorkerEvent::Sync { tag, periodic } => self.on_sync(&tag, periodic),
            WorkerEvent::NotificationClick { action, notification } => {
                self.on_click(action, notification)
            }
            WorkerEvent::TimerFired { request } => {
                if request.is_trip_tracking() && !self.state.tracking_active {
                    debug!(title = %request.title, "tracking stopped, dropping delayed notification");
                    return Vec::new();
                }
                vec![WorkerEffect::Present(request)]
            }
        }
    }

    fn on_message(&mut self, message: WorkerMessage) -> Vec<WorkerEffect> {
        match message {
            WorkerMessage::StartTracking => self.set_tracking(true),
            WorkerMessage::StopTracking => self.set_tracking(false),
            WorkerMessage::Notification { title, body } => {
                let request =
                    NotificationRequest::preset(NotificationPreset::Manual { title, body });
                vec![WorkerEffect::Present(self.decorate(request))]
            }
            WorkerMessage::ShowNotification { title, options } => {
                let request = NotificationRequest::from_options(title, options);
                vec![WorkerEffect::Present(self.decorate(request))]
            }
            WorkerMessage::DelayedNotification { title, options, delay_ms } => {
                let request = self.decorate(NotificationRequest::from_options(title, options));
                vec![WorkerEffect::Schedule { request, delay: Duration::from_millis(delay_ms) }]
            }
            WorkerMessage::NotificationClicked { .. } => {
                debug!("ignoring worker-bound notification-clicked");
                Vec::new()
            }
        }
    }

    fn on_push(&mut self, raw: Option<&[u8]>) -> Vec<WorkerEffect> {
        let payload = PushPayload::parse(raw).unwrap_or_else(|err| {
            warn!(error = %err, "malformed push payload, using defaults");
            PushPayload::default()
        });
        let request = NotificationRequest::preset(NotificationPreset::Push {
            payload,
            app_url: self.app_url.clone(),
        });
        vec![WorkerEffect::Present(self.decorate(request))]
    }

    fn on_sync(&mut self, tag: &str, periodic: bool) -> Vec<WorkerEffect> {
        if tag != SYNC_TAG_TRACKING {
            debug!(tag, "ignoring unknown sync tag");
            return Vec::new();
        }
        if !self.state.tracking_active {
            return Vec::new();
        }
        let preset = if periodic {
            NotificationPreset::TrackingActive
        } else {
            NotificationPreset::StillTracking
        };
        vec![WorkerEffect::Present(self.decorate(NotificationRequest::preset(preset)))]
    }

    fn on_click(
        &mut self,
        action: Option<String>,
        notification: NotificationRequest,
    ) -> Vec<WorkerEffect> {
        let mut effects = vec![WorkerEffect::Close { tag: notification.tag.clone() }];

        if action.as_deref() == Some(ACTION_STOP) {
            info!("stop requested from notification");
            effects.extend(self.set_tracking(false));
            effects.push(WorkerEffect::Broadcast(WorkerMessage::StopTracking));
            return effects;
        }

        let url = notification.target_url().unwrap_or(&self.app_url).to_string();
        effects.push(WorkerEffect::FocusOrOpen { url });
        effects.push(WorkerEffect::Broadcast(WorkerMessage::NotificationClicked {
            action,
            data: notification.data,
        }));
        effects
    }

    fn set_tracking(&mut self, active: bool) -> Vec<WorkerEffect> {
        if self.state.tracking_active == active {
            return Vec::new();
        }
        self.state.tracking_active = active;
        info!(tracking_active = active, "worker tracking flag changed");
        vec![WorkerEffect::Persist(self.state)]
    }

    fn decorate(&self, mut request: NotificationRequest) -> NotificationRequest {
        if request.icon.is_none() {
            request.icon = Some(self.icon.clone());
        }
        if request.badge.is_none() {
            request.badge = Some(self.icon.clone());
        }
        request
    }
}

/// Pick the window to focus for `target`: the first window client whose URL
/// lies under `target` (resolved against the client's own origin).
pub fn focus_target<'a>(clients: &'a [ClientInfo], target: &str) -> Option<&'a ClientInfo> {
    clients.iter().filter(|client| client.kind == ClientKind::Window).find(|client| {
        let Ok(client_url) = Url::parse(&client.url) else {
            return false;
        };
        let Ok(target_url) = client_url.join(target) else {
            return false;
        };
        client_url.origin() == target_url.origin()
            && client_url.path().starts_with(target_url.path())
    })
}
