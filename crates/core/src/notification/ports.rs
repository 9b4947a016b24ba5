//! Port interfaces for notification delivery
//!
//! These traits define the boundaries between the tracking logic and the
//! contexts that can actually put something on screen.

use async_trait::async_trait;
use spotsurfer_domain::{NotificationRequest, Result, WorkerMessage};

/// "Present a notification to the user now."
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn notify(&self, request: NotificationRequest) -> Result<()>;
}

/// Platform notification surface owned by whichever context holds it.
#[async_trait]
pub trait NotificationPresenter: Send + Sync {
    async fn show(&self, request: &NotificationRequest) -> Result<()>;

    /// Dismiss the notification carrying `tag`, if still shown.
    async fn close(&self, tag: &str) -> Result<()>;
}

/// Foreground → worker message sink.
///
/// Fire-and-forget: `Ok` means the message was handed to the channel, not
/// that the worker has processed it.
#[async_trait]
pub trait WorkerPort: Send + Sync {
    async fn post(&self, message: WorkerMessage) -> Result<()>;
}
