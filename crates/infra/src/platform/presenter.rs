//! Notification presenter that writes to the log.

use async_trait::async_trait;
use parking_lot::Mutex;
use spotsurfer_core::NotificationPresenter;
use spotsurfer_domain::{NotificationRequest, Result};
use tracing::info;

#[derive(Default)]
struct Shown {
    /// Currently displayed, one per tag.
    active: Vec<NotificationRequest>,
    history: Vec<NotificationRequest>,
}

/// Presents notifications as structured log lines.
///
/// Tag semantics follow the platform: showing a notification replaces any
/// displayed one with the same tag.
#[derive(Default)]
pub struct LogNotificationPresenter {
    shown: Mutex<Shown>,
}

impl LogNotificationPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications currently on screen.
    pub fn active(&self) -> Vec<NotificationRequest> {
        self.shown.lock().active.clone()
    }

    /// Every notification ever presented, oldest first.
    pub fn history(&self) -> Vec<NotificationRequest> {
        self.shown.lock().history.clone()
    }
}

#[async_trait]
impl NotificationPresenter for LogNotificationPresenter {
    async fn show(&self, request: &NotificationRequest) -> Result<()> {
        info!(
            title = %request.title,
            body = %request.body,
            tag = %request.tag,
            actions = request.actions.len(),
            "notification"
        );
        let mut shown = self.shown.lock();
        shown.active.retain(|existing| existing.tag != request.tag);
        shown.active.push(request.clone());
        shown.history.push(request.clone());
        Ok(())
    }

    async fn close(&self, tag: &str) -> Result<()> {
        self.shown.lock().active.retain(|existing| existing.tag != tag);
        Ok(())
    }
}
