//! Repeating sampler for the foreground tracking service.
//!
//! Calls [`TrackingService::tick`] once per interval until the session ends
//! or the scheduler is stopped. After `stop` returns no further tick starts,
//! and a tick still waiting on its sample is dropped; the service discards
//! any fix that resolves for a finished session.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use spotsurfer_core::TrackingService;
//! use spotsurfer_infra::scheduling::{TrackingScheduler, TrackingSchedulerConfig};
//!
//! # async fn example(service: Arc<TrackingService>) -> Result<(), Box<dyn std::error::Error>> {
//! let mut scheduler = TrackingScheduler::new(service.clone(), TrackingSchedulerConfig::default());
//!
//! service.start().await?;
//! scheduler.start().await?;
//! // ... trip runs ...
//! scheduler.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use spotsurfer_core::{TickOutcome, TrackingService};
use spotsurfer_domain::TrackingConfig;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// Type alias for task handle to avoid complexity warnings
type TaskHandle = Arc<Mutex<Option<JoinHandle<()>>>>;

/// Configuration for the tracking scheduler
#[derive(Debug, Clone)]
pub struct TrackingSchedulerConfig {
    /// Time between samples
    pub interval: Duration,
    /// Upper bound for a single tick (sample + notification)
    pub tick_timeout: Duration,
    /// How long `stop` waits for the loop to wind down
    pub join_timeout: Duration,
}

impl Default for TrackingSchedulerConfig {
    fn default() -> Self {
        Self::from(&TrackingConfig::default())
    }
}

impl From<&TrackingConfig> for TrackingSchedulerConfig {
    fn from(config: &TrackingConfig) -> Self {
        Self {
            interval: config.sample_interval(),
            // A tick waits at most for the sampler timeout plus presentation.
            tick_timeout: Duration::from_millis(config.sample_timeout_ms) + Duration::from_secs(5),
            join_timeout: Duration::from_secs(5),
        }
    }
}

/// Tracking scheduler for periodic geofence evaluation
pub struct TrackingScheduler {
    service: Arc<TrackingService>,
    config: TrackingSchedulerConfig,
    cancellation_token: CancellationToken,
    task_handle: TaskHandle,
}

impl TrackingScheduler {
    pub fn new(service: Arc<TrackingService>, config: TrackingSchedulerConfig) -> Self {
        Self {
            service,
            config,
            cancellation_token: CancellationToken::new(),
            task_handle: Arc::new(Mutex::new(None)),
        }
    }

    /// Start the repeating sampler
    ///
    /// # Errors
    ///
    /// Returns error if scheduler is already running
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        info!(interval_ms = self.config.interval.as_millis() as u64, "Starting tracking scheduler");

        // Create a new cancellation token (supports restart after stop)
        self.cancellation_token = CancellationToken::new();

        let service = Arc::clone(&self.service);
        let config = self.config.clone();
        let cancel = self.cancellation_token.clone();

        let handle = tokio::spawn(async move {
            Self::tracking_loop(service, config, cancel).await;
        });

        *self.task_handle.lock().await = Some(handle);

        Ok(())
    }

    /// Stop the scheduler and wait for the loop to exit
    ///
    /// # Errors
    ///
    /// Returns error if scheduler is not running
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        if !self.is_running() {
            return Err(SchedulerError::NotRunning);
        }

        info!("Stopping tracking scheduler");
        self.cancellation_token.cancel();
        self.join_with_timeout().await?;
        info!("Tracking scheduler stopped");

        Ok(())
    }

    /// Wait until the loop ends on its own (session over) or is cancelled.
    ///
    /// Dropping the returned future leaves the loop running, so `stop` still
    /// works afterwards.
    ///
    /// # Errors
    ///
    /// Returns error if the loop task panicked
    pub async fn wait(&mut self) -> SchedulerResult<()> {
        let mut guard = self.task_handle.lock().await;
        if let Some(handle) = guard.as_mut() {
            let joined = handle.await;
            guard.take();
            joined?;
        }
        Ok(())
    }

    /// Check if scheduler is running
    ///
    /// A scheduler is considered running if it has an active task handle that
    /// hasn't finished.
    pub fn is_running(&self) -> bool {
        self.task_handle
            .try_lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    async fn join_with_timeout(&self) -> SchedulerResult<()> {
        if let Some(handle) = self.task_handle.lock().await.take() {
            let join_timeout = self.config.join_timeout;
            tokio::time::timeout(join_timeout, handle)
                .await
                .map_err(|_| SchedulerError::Timeout { duration: join_timeout })??;
        }
        Ok(())
    }

    /// Background sampling loop
    async fn tracking_loop(
        service: Arc<TrackingService>,
        config: TrackingSchedulerConfig,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("Tracking loop cancelled");
                    break;
                }
                _ = tokio::time::sleep(config.interval) => {
                    let outcome = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            debug!("Tracking loop cancelled mid-tick");
                            break;
                        }
                        result = tokio::time::timeout(config.tick_timeout, service.tick()) => result,
                    };

                    match outcome {
                        Ok(outcome) if outcome.continues() => {}
                        Ok(TickOutcome::Inactive) => {
                            debug!("No active trip, tracking loop exiting");
                            break;
                        }
                        Ok(outcome) => {
                            info!(outcome = ?outcome, "Trip ended, tracking loop exiting");
                            break;
                        }
                        Err(_) => {
                            warn!(timeout_ms = config.tick_timeout.as_millis() as u64, "Tracking tick timed out");
                        }
                    }
                }
            }
        }
    }
}

/// Ensure scheduler is stopped when dropped
impl Drop for TrackingScheduler {
    fn drop(&mut self) {
        if !self.cancellation_token.is_cancelled() && self.is_running() {
            warn!("TrackingScheduler dropped while running; cancelling");
            self.cancellation_token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use spotsurfer_core::{DirectNotificationChannel, GeoSampler, GeofencePolicy, WorkerPort};
    use spotsurfer_domain::{Coordinate, SampleOptions, WorkerMessage};

    use super::*;
    use crate::platform::{LogNotificationPresenter, ReplayGeoSampler};

    struct NullWorker;

    #[async_trait::async_trait]
    impl WorkerPort for NullWorker {
        async fn post(&self, _message: WorkerMessage) -> spotsurfer_domain::Result<()> {
            Ok(())
        }
    }

    /// Always reports the same fix; the second request takes `delay`.
    struct SlowSecondSample {
        calls: AtomicUsize,
        delay: Duration,
    }

    #[async_trait::async_trait]
    impl GeoSampler for SlowSecondSample {
        async fn sample_once(&self, _options: &SampleOptions) -> spotsurfer_domain::Result<Coordinate> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 1 {
                tokio::time::sleep(self.delay).await;
            }
            Ok(Coordinate::new(39.6277, -106.5013))
        }
    }

    fn fixture(track: Vec<Coordinate>) -> (Arc<TrackingService>, Arc<ReplayGeoSampler>, Arc<LogNotificationPresenter>) {
        let sampler = Arc::new(ReplayGeoSampler::new(track));
        let presenter = Arc::new(LogNotificationPresenter::new());
        let service = Arc::new(TrackingService::new(
            sampler.clone(),
            Arc::new(DirectNotificationChannel::new(presenter.clone())),
            Arc::new(NullWorker),
            GeofencePolicy::default(),
        ));
        (service, sampler, presenter)
    }

    fn config() -> TrackingSchedulerConfig {
        TrackingSchedulerConfig {
            interval: Duration::from_secs(10),
            tick_timeout: Duration::from_secs(15),
            join_timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn runs_trip_to_completion() {
        let (service, _sampler, presenter) = fixture(vec![
            Coordinate::new(39.6277, -106.5013),
            Coordinate::new(39.6290, -106.5013),
            Coordinate::new(39.6330, -106.5013),
            Coordinate::new(39.6330, -106.5013),
            Coordinate::new(39.6278, -106.5013),
        ]);
        let mut scheduler = TrackingScheduler::new(service.clone(), config());

        service.start().await.unwrap();
        scheduler.start().await.unwrap();
        scheduler.wait().await.unwrap();

        assert!(!scheduler.is_running());
        assert!(!service.is_active());
        let titles: Vec<_> = presenter.history().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["🚗 Trip Started", "📍 Destination Reached", "🏠 Welcome Back"]);
    }

    #[tokio::test(start_paused = true)]
    async fn no_tick_after_stop() {
        let (service, sampler, _presenter) = fixture(vec![
            Coordinate::new(39.6277, -106.5013),
            Coordinate::new(39.6277, -106.5013),
            Coordinate::new(39.6277, -106.5013),
        ]);
        let mut scheduler = TrackingScheduler::new(service.clone(), config());

        service.start().await.unwrap();
        scheduler.start().await.unwrap();
        tokio::time::sleep(Duration::from_secs(11)).await;
        let consumed = sampler.consumed();
        assert_eq!(consumed, 2);

        scheduler.stop().await.unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(sampler.consumed(), consumed);
        assert!(service.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn double_start_fails() {
        let (service, _, _) = fixture(vec![Coordinate::new(1.0, 1.0)]);
        let mut scheduler = TrackingScheduler::new(service.clone(), config());
        service.start().await.unwrap();

        scheduler.start().await.unwrap();
        assert!(matches!(scheduler.start().await, Err(SchedulerError::AlreadyRunning)));
        scheduler.stop().await.unwrap();
        assert!(matches!(scheduler.stop().await, Err(SchedulerError::NotRunning)));
    }

    #[tokio::test(start_paused = true)]
    async fn exits_when_no_trip_is_active() {
        let (service, _, _) = fixture(Vec::new());
        let mut scheduler = TrackingScheduler::new(service, config());

        scheduler.start().await.unwrap();
        scheduler.wait().await.unwrap();
        assert!(!scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_sampling_when_trip_restarts_mid_sample() {
        let sampler = Arc::new(SlowSecondSample { calls: AtomicUsize::new(0), delay: Duration::from_secs(8) });
        let service = Arc::new(TrackingService::new(
            sampler.clone(),
            Arc::new(DirectNotificationChannel::new(Arc::new(LogNotificationPresenter::new()))),
            Arc::new(NullWorker),
            GeofencePolicy::default(),
        ));
        let mut scheduler = TrackingScheduler::new(service.clone(), config());

        service.start().await.unwrap();
        scheduler.start().await.unwrap();

        // First tick fires at 10s and its sample resolves at 18s.
        tokio::time::sleep(Duration::from_secs(12)).await;
        assert!(service.stop().await);
        assert!(service.start().await.unwrap().started);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(scheduler.is_running());
        assert!(service.is_active());
        // start, stale tick, restart, then ticks at 28s and 38s.
        assert!(sampler.calls.load(Ordering::SeqCst) >= 5);

        scheduler.stop().await.unwrap();
    }
}
