//! Application context - dependency injection container

use std::sync::Arc;

use spotsurfer_core::{
    GeoSampler, GeofencePolicy, NotificationPresenter, PushSubscriptionManager,
    RoutedNotificationChannel, StartReport, TrackingOptions, TrackingService, TripAnnouncer,
    WorkerEvent, WorkerPort, WorkerStateStore,
};
use spotsurfer_domain::{Config, Result, SpotSurferError};
use spotsurfer_infra::worker::ClientConnection;
use spotsurfer_infra::{
    AssistantClient, HttpSubscriptionRegistrar, InMemoryStateStore, LocalClientRegistry,
    LocalPushService, LogNotificationPresenter, SchedulerError, TrackingScheduler,
    TrackingSchedulerConfig, WorkerHandle, WorkerRuntime,
};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub tracking_service: Arc<TrackingService>,
    pub presenter: Arc<LogNotificationPresenter>,
    pub clients: Arc<LocalClientRegistry>,
    pub worker: WorkerHandle,
    pub push: Option<Arc<PushSubscriptionManager>>,

    scheduler: Mutex<TrackingScheduler>,
    /// Feeds worker → foreground messages into the tracking service.
    forwarder: Mutex<Option<JoinHandle<()>>>,
}

impl AppContext {
    /// Build the context with worker state kept in memory.
    ///
    /// # Errors
    /// Returns `Config` if the configuration is invalid.
    pub async fn new(config: Config, sampler: Arc<dyn GeoSampler>) -> Result<Self> {
        Self::with_state_store(config, sampler, Arc::new(InMemoryStateStore::new())).await
    }

    /// Build the context, restoring worker state from `store`.
    ///
    /// # Errors
    /// Returns `Config` if the configuration is invalid or the server URL
    /// cannot be parsed.
    pub async fn with_state_store(
        config: Config,
        sampler: Arc<dyn GeoSampler>,
        store: Arc<dyn WorkerStateStore>,
    ) -> Result<Self> {
        config.validate()?;
        let policy = GeofencePolicy::from_config(&config.tracking)?;
        let client_url = foreground_url(&config)?;

        let presenter = Arc::new(LogNotificationPresenter::new());
        let clients = Arc::new(LocalClientRegistry::new());

        let worker = WorkerRuntime::new(
            config.notifications.clone(),
            presenter.clone(),
            clients.clone(),
            store,
        )
        .spawn()
        .await;

        // Attach before activation so the foreground ends up controlled.
        let connection = clients.connect(client_url);
        worker.dispatch(WorkerEvent::Install)?;
        worker.dispatch(WorkerEvent::Activate)?;

        let worker_port: Arc<dyn WorkerPort> = Arc::new(worker.clone());
        let direct: Arc<dyn NotificationPresenter> = presenter.clone();
        let channel = Arc::new(RoutedNotificationChannel::new(Some(worker_port.clone()), direct));

        let mut service = TrackingService::new(sampler, channel, worker_port, policy)
            .with_options(TrackingOptions::from(&config.tracking));

        let push = if config.push.enabled {
            let manager = Arc::new(PushSubscriptionManager::new(
                Arc::new(LocalPushService::new(&config.push)),
                Arc::new(HttpSubscriptionRegistrar::new(&config.server)?),
            ));
            service = service.with_push(manager.clone());
            Some(manager)
        } else {
            debug!("push notifications disabled");
            None
        };

        if config.server.announce_start {
            let announcer: Arc<dyn TripAnnouncer> = Arc::new(AssistantClient::new(&config.server)?);
            service = service.with_announcer(announcer);
        }

        let tracking_service = Arc::new(service);
        let scheduler = TrackingScheduler::new(
            tracking_service.clone(),
            TrackingSchedulerConfig::from(&config.tracking),
        );
        let forwarder = spawn_forwarder(connection, tracking_service.clone());

        info!(server = %config.server.base_url, push = push.is_some(), "application context ready");

        Ok(Self {
            config,
            tracking_service,
            presenter,
            clients,
            worker,
            push,
            scheduler: Mutex::new(scheduler),
            forwarder: Mutex::new(Some(forwarder)),
        })
    }

    /// Start a trip and the repeating sampler behind it.
    ///
    /// # Errors
    /// Propagates `PermissionDenied` from the first fix; the sampler is not
    /// started in that case.
    pub async fn start_trip(&self) -> Result<StartReport> {
        let report = self.tracking_service.start().await?;
        if self.tracking_service.is_active() {
            let mut scheduler = self.scheduler.lock().await;
            if report.started && scheduler.is_running() {
                // Loop left over from a session stopped elsewhere; restart the cadence.
                debug!("restarting sampler for new session");
                match scheduler.stop().await {
                    Ok(()) | Err(SchedulerError::NotRunning) => {}
                    Err(err) => return Err(err.into()),
                }
            }
            if !scheduler.is_running() {
                scheduler.start().await?;
            }
        }
        Ok(report)
    }

    /// Resolve once the sampler has wound down, which happens when the
    /// session ends by returning home or by a stop from any context.
    ///
    /// # Errors
    /// Returns `Internal` if the sampling task panicked.
    pub async fn wait_for_trip(&self) -> Result<()> {
        self.scheduler.lock().await.wait().await?;
        Ok(())
    }

    /// Stop the trip from the foreground. Returns whether one was running.
    ///
    /// # Errors
    /// Returns `Timeout` if the sampler does not wind down in time.
    pub async fn stop_trip(&self) -> Result<bool> {
        let was_active = self.tracking_service.stop().await;
        let mut scheduler = self.scheduler.lock().await;
        if scheduler.is_running() {
            scheduler.stop().await?;
        }
        Ok(was_active)
    }

    /// Tear everything down. Pending delayed notifications are dropped.
    pub async fn shutdown(&self) {
        {
            let mut scheduler = self.scheduler.lock().await;
            if scheduler.is_running() {
                if let Err(err) = scheduler.stop().await {
                    warn!(error = %err, "tracking scheduler did not stop cleanly");
                }
            }
        }
        self.worker.shutdown().await;
        if let Some(forwarder) = self.forwarder.lock().await.take() {
            forwarder.abort();
        }
        info!("application context shut down");
    }
}

/// Absolute URL of the foreground window: the app URL on the server origin.
fn foreground_url(config: &Config) -> Result<String> {
    let base = Url::parse(&config.server.base_url).map_err(|e| {
        SpotSurferError::Config(format!("invalid server.base_url {}: {e}", config.server.base_url))
    })?;
    let url = base.join(&config.notifications.app_url).map_err(|e| {
        SpotSurferError::Config(format!(
            "invalid notifications.app_url {}: {e}",
            config.notifications.app_url
        ))
    })?;
    Ok(url.into())
}

fn spawn_forwarder(connection: ClientConnection, service: Arc<TrackingService>) -> JoinHandle<()> {
    let ClientConnection { info, mut messages } = connection;
    tokio::spawn(async move {
        while let Some(message) = messages.recv().await {
            if service.handle_worker_message(&message) {
                info!(client = %info.id, "trip ended by the background worker");
            }
        }
        debug!(client = %info.id, "worker channel closed");
    })
}
