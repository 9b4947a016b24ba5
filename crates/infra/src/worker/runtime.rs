//! Worker event loop and effect execution

use std::sync::Arc;

use async_trait::async_trait;
use spotsurfer_core::{
    focus_target, BackgroundWorker, ClientRegistry, NotificationPresenter, WorkerEffect,
    WorkerEvent, WorkerPort, WorkerStateStore,
};
use spotsurfer_domain::{NotificationConfig, NotificationRequest, Result, SpotSurferError, WorkerMessage};
use tokio::sync::mpsc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Builds and spawns the worker.
pub struct WorkerRuntime {
    config: NotificationConfig,
    presenter: Arc<dyn NotificationPresenter>,
    clients: Arc<dyn ClientRegistry>,
    store: Arc<dyn WorkerStateStore>,
}

struct EffectContext {
    presenter: Arc<dyn NotificationPresenter>,
    clients: Arc<dyn ClientRegistry>,
    store: Arc<dyn WorkerStateStore>,
    events: mpsc::UnboundedSender<WorkerEvent>,
    timers: CancellationToken,
}

impl WorkerRuntime {
    pub fn new(
        config: NotificationConfig,
        presenter: Arc<dyn NotificationPresenter>,
        clients: Arc<dyn ClientRegistry>,
        store: Arc<dyn WorkerStateStore>,
    ) -> Self {
        Self { config, presenter, clients, store }
    }

    /// Restore persisted state and start the event loop.
    ///
    /// A store that cannot be read starts the worker from the default state.
    pub async fn spawn(self) -> WorkerHandle {
        let state = match self.store.load().await {
            Ok(state) => state.unwrap_or_default(),
            Err(err) => {
                warn!(error = %err, "could not restore worker state, starting fresh");
                Default::default()
            }
        };
        info!(tracking_active = state.tracking_active, "background worker starting");

        let worker = BackgroundWorker::new(&self.config).with_state(state);
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let context = EffectContext {
            presenter: self.presenter,
            clients: self.clients,
            store: self.store,
            events: tx.clone(),
            timers: cancel.child_token(),
        };
        let task = tokio::spawn(event_loop(worker, rx, context, cancel.clone()));

        WorkerHandle { events: tx, cancel, task: Arc::new(Mutex::new(Some(task))) }
    }
}

async fn event_loop(
    mut worker: BackgroundWorker,
    mut events: mpsc::UnboundedReceiver<WorkerEvent>,
    context: EffectContext,
    cancel: CancellationToken,
) {
    loop {
        let event = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            event = events.recv() => match event {
                Some(event) => event,
                None => break,
            },
        };

        for effect in worker.handle(event) {
            context.execute(effect, worker.app_url()).await;
        }
    }
    debug!("worker event loop stopped");
}

impl EffectContext {
    /// Carry out one effect. Failures are logged and never stop the loop.
    async fn execute(&self, effect: WorkerEffect, app_url: &str) {
        let outcome = match effect {
            WorkerEffect::Present(request) => self.presenter.show(&request).await,
            WorkerEffect::Schedule { request, delay } => {
                self.schedule(request, delay);
                Ok(())
            }
            WorkerEffect::Close { tag } => self.presenter.close(&tag).await,
            WorkerEffect::Broadcast(message) => self.broadcast(&message).await,
            WorkerEffect::FocusOrOpen { url } => self.focus_or_open(&url, app_url).await,
            WorkerEffect::Persist(state) => self.store.save(&state).await,
            WorkerEffect::SkipWaiting => {
                debug!("skip waiting");
                Ok(())
            }
            WorkerEffect::ClaimClients => self.clients.claim().await,
        };

        if let Err(err) = outcome {
            warn!(error = %err, kind = err.label(), "worker effect failed");
        }
    }

    fn schedule(&self, request: NotificationRequest, delay: std::time::Duration) {
        let events = self.events.clone();
        let cancel = self.timers.clone();
        debug!(delay_ms = delay.as_millis() as u64, title = %request.title, "scheduling notification");
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(title = %request.title, "pending notification dropped with worker");
                }
                _ = tokio::time::sleep(delay) => {
                    // The loop may already be gone; nothing else to do then.
                    let _ = events.send(WorkerEvent::TimerFired { request });
                }
            }
        });
    }

    async fn broadcast(&self, message: &WorkerMessage) -> Result<()> {
        let clients = self.clients.match_all(true).await?;
        debug!(kind = message.kind(), clients = clients.len(), "broadcasting to clients");
        for client in clients {
            if let Err(err) = self.clients.post_message(&client.id, message).await {
                warn!(error = %err, client = %client.id, "failed to message client");
            }
        }
        Ok(())
    }

    async fn focus_or_open(&self, url: &str, app_url: &str) -> Result<()> {
        let clients = self.clients.match_all(true).await?;
        let target = focus_target(&clients, url).or_else(|| focus_target(&clients, app_url));
        match target {
            Some(client) => self.clients.focus(&client.id).await,
            None => {
                let id = self.clients.open_window(url).await?;
                debug!(client = %id, url, "opened new window");
                Ok(())
            }
        }
    }
}

/// Cloneable sender side of a running worker.
#[derive(Clone)]
pub struct WorkerHandle {
    events: mpsc::UnboundedSender<WorkerEvent>,
    cancel: CancellationToken,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl WorkerHandle {
    /// Queue a platform event for the worker.
    ///
    /// # Errors
    /// Returns `Internal` once the worker has shut down.
    pub fn dispatch(&self, event: WorkerEvent) -> Result<()> {
        self.events
            .send(event)
            .map_err(|_| SpotSurferError::Internal("background worker is not running".into()))
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled() && !self.events.is_closed()
    }

    /// Stop the loop and drop every pending timer, as an eviction would.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        if let Some(task) = self.task.lock().await.take() {
            if let Err(err) = task.await {
                warn!(error = %err, "worker task ended abnormally");
            }
        }
        info!("background worker stopped");
    }
}

#[async_trait]
impl WorkerPort for WorkerHandle {
    async fn post(&self, message: WorkerMessage) -> Result<()> {
        self.dispatch(WorkerEvent::Message(message))
    }
}
