//! [`NotificationChannel`] implementations
//!
//! Presentation either happens in the calling context or is forwarded to the
//! background worker as a `show-notification` message.

use std::sync::Arc;

use async_trait::async_trait;
use spotsurfer_domain::{NotificationRequest, Result, WorkerMessage};
use tracing::{debug, warn};

use super::ports::{NotificationChannel, NotificationPresenter, WorkerPort};

/// Presents through a presenter held by the calling context.
pub struct DirectNotificationChannel {
    presenter: Arc<dyn NotificationPresenter>,
}

impl DirectNotificationChannel {
    pub fn new(presenter: Arc<dyn NotificationPresenter>) -> Self {
        Self { presenter }
    }
}

#[async_trait]
impl NotificationChannel for DirectNotificationChannel {
    async fn notify(&self, request: NotificationRequest) -> Result<()> {
        self.presenter.show(&request).await
    }
}

/// Forwards every request to the background worker.
pub struct WorkerNotificationChannel {
    worker: Arc<dyn WorkerPort>,
}

impl WorkerNotificationChannel {
    pub fn new(worker: Arc<dyn WorkerPort>) -> Self {
        Self { worker }
    }
}

#[async_trait]
impl NotificationChannel for WorkerNotificationChannel {
    async fn notify(&self, request: NotificationRequest) -> Result<()> {
        self.worker.post(WorkerMessage::show(request)).await
    }
}

/// Prefers the worker and falls back to direct presentation when the worker
/// is absent or refuses the message.
pub struct RoutedNotificationChannel {
    worker: Option<Arc<dyn WorkerPort>>,
    direct: Arc<dyn NotificationPresenter>,
}

impl RoutedNotificationChannel {
    pub fn new(worker: Option<Arc<dyn WorkerPort>>, direct: Arc<dyn NotificationPresenter>) -> Self {
        Self { worker, direct }
    }
}

#[async_trait]
impl NotificationChannel for RoutedNotificationChannel {
    async fn notify(&self, request: NotificationRequest) -> Result<()> {
        if let Some(worker) = &self.worker {
            match worker.post(WorkerMessage::show(request.clone())).await {
                Ok(()) => return Ok(()),
                Err(err) => {
                    warn!(error = %err, tag = %request.tag, "worker unavailable, presenting directly");
                }
            }
        } else {
            debug!(tag = %request.tag, "no worker attached, presenting directly");
        }
        self.direct.show(&request).await
    }
}
