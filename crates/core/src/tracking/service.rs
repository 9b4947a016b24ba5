//! Foreground trip tracking service - core business logic
//!
//! Owns the [`TrackingStateMachine`] for the foreground context and wires it
//! to the sampler, the notification channel and the worker. The repeating
//! schedule lives in infrastructure; this service only knows how to start,
//! run one tick and stop.

use std::sync::Arc;

use parking_lot::Mutex;
use spotsurfer_domain::{
    Coordinate, NotificationPreset, NotificationRequest, Result, SampleOptions, SpotSurferError,
    TrackingConfig, TrackingSession, TripPhase, WorkerMessage,
};
use tracing::{debug, info, warn};

use super::machine::{GeofencePolicy, TrackingStateMachine, Transition};
use super::ports::TripAnnouncer;
use crate::geo::ports::GeoSampler;
use crate::notification::ports::{NotificationChannel, WorkerPort};
use crate::push::manager::PushSubscriptionManager;

/// Per-service behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingOptions {
    pub sample: SampleOptions,
    /// Present a "trip started" notification when a session starts.
    pub notify_on_start: bool,
}

impl Default for TrackingOptions {
    fn default() -> Self {
        Self { sample: SampleOptions::default(), notify_on_start: true }
    }
}

impl From<&TrackingConfig> for TrackingOptions {
    fn from(config: &TrackingConfig) -> Self {
        Self { sample: config.sample_options(), notify_on_start: config.notify_on_start }
    }
}

/// What `start` did.
#[derive(Debug, Clone, PartialEq)]
pub struct StartReport {
    pub generation: u64,
    /// `false` when a session was already running and was left as is.
    pub started: bool,
    pub start_coordinate: Option<Coordinate>,
    /// Subscription problems are reported, not fatal.
    pub push_error: Option<SpotSurferError>,
}

/// What one sampling tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// No live session; the schedule should wind down.
    Inactive,
    /// Sampling failed; nothing changed.
    Skipped(SpotSurferError),
    /// The fix belonged to a session that ended while it was in flight, and
    /// a newer session is already live. The fix was discarded.
    Superseded,
    /// The fix was fed to the live session.
    Applied(Transition),
}

impl TickOutcome {
    /// Whether the repeating schedule should keep going.
    pub fn continues(&self) -> bool {
        match self {
            Self::Inactive => false,
            Self::Skipped(_) | Self::Superseded => true,
            Self::Applied(transition) => !transition.ends_session(),
        }
    }
}

/// Foreground trip tracking service
pub struct TrackingService {
    sampler: Arc<dyn GeoSampler>,
    channel: Arc<dyn NotificationChannel>,
    worker: Arc<dyn WorkerPort>,
    push: Option<Arc<PushSubscriptionManager>>,
    announcer: Option<Arc<dyn TripAnnouncer>>,
    options: TrackingOptions,
    machine: Mutex<TrackingStateMachine>,
}

impl TrackingService {
    pub fn new(
        sampler: Arc<dyn GeoSampler>,
        channel: Arc<dyn NotificationChannel>,
        worker: Arc<dyn WorkerPort>,
        policy: GeofencePolicy,
    ) -> Self {
        Self {
            sampler,
            channel,
            worker,
            push: None,
            announcer: None,
            options: TrackingOptions::default(),
            machine: Mutex::new(TrackingStateMachine::new(policy)),
        }
    }

    /// Ensure a push subscription whenever a trip starts.
    pub fn with_push(mut self, push: Arc<PushSubscriptionManager>) -> Self {
        self.push = Some(push);
        self
    }

    /// Announce trip starts to the remote assistant.
    pub fn with_announcer(mut self, announcer: Arc<dyn TripAnnouncer>) -> Self {
        self.announcer = Some(announcer);
        self
    }

    pub fn with_options(mut self, options: TrackingOptions) -> Self {
        self.options = options;
        self
    }

    pub fn session(&self) -> TrackingSession {
        self.machine.lock().session().clone()
    }

    pub fn phase(&self) -> TripPhase {
        self.machine.lock().phase()
    }

    pub fn is_active(&self) -> bool {
        self.machine.lock().is_active()
    }

    /// Start a trip.
    ///
    /// Ensures the push subscription, takes the first fix and tells the worker.
    ///
    /// # Errors
    /// Returns `PermissionDenied` when location access is refused; the
    /// session is not left running in that case. Other sampling failures only
    /// defer arming to the next tick.
    pub async fn start(&self) -> Result<StartReport> {
        let (started, generation) = {
            let mut machine = self.machine.lock();
            let started = machine.start();
            (started, machine.generation())
        };

        if !started {
            debug!(generation, "start requested while a trip is already tracked");
            return Ok(StartReport {
                generation,
                started: false,
                start_coordinate: self.session().start_coordinate,
                push_error: None,
            });
        }

        info!(generation, "trip tracking started");

        let push_error = match &self.push {
            Some(push) => match push.ensure_subscription().await {
                Ok(_) => None,
                Err(err) => {
                    warn!(error = %err, kind = err.label(), "push subscription not ensured");
                    Some(err)
                }
            },
            None => None,
        };

        let start_coordinate = match self.sampler.sample_once(&self.options.sample).await {
            Ok(fix) => {
                let transition = self.machine.lock().observe_for(generation, fix);
                match transition {
                    Transition::Armed { start } => Some(start),
                    _ => None,
                }
            }
            Err(err @ SpotSurferError::PermissionDenied(_)) => {
                self.machine.lock().stop();
                warn!(error = %err, "location permission denied, trip not started");
                return Err(err);
            }
            Err(err) => {
                debug!(error = %err, "first fix unavailable, arming on next tick");
                None
            }
        };

        if self.machine.lock().generation() != generation {
            debug!(generation, "trip stopped while starting");
            return Ok(StartReport { generation, started: false, start_coordinate: None, push_error });
        }

        self.post(WorkerMessage::StartTracking).await;

        if self.options.notify_on_start {
            self.present(NotificationRequest::preset(NotificationPreset::TripStarted)).await;
        }

        if let Some(start) = start_coordinate {
            self.announce(start);
        }

        Ok(StartReport { generation, started: true, start_coordinate, push_error })
    }

    /// Run one sampling tick.
    ///
    /// Sampling errors never end the session. A fix that arrives after the
    /// session it was requested for has ended is discarded; the outcome is
    /// [`TickOutcome::Superseded`] when a newer session is live by then, so
    /// the schedule keeps sampling it.
    pub async fn tick(&self) -> TickOutcome {
        let generation = {
            let machine = self.machine.lock();
            if !machine.is_active() {
                return TickOutcome::Inactive;
            }
            machine.generation()
        };

        let fix = match self.sampler.sample_once(&self.options.sample).await {
            Ok(fix) => fix,
            Err(err) => {
                debug!(error = %err, kind = err.label(), "sample failed, skipping tick");
                return TickOutcome::Skipped(err);
            }
        };

        let (transition, active) = {
            let mut machine = self.machine.lock();
            let transition = machine.observe_for(generation, fix);
            (transition, machine.is_active())
        };

        if transition == Transition::Discarded {
            if active {
                debug!(generation, "discarding sample for an earlier session");
                return TickOutcome::Superseded;
            }
            debug!(generation, "discarding sample for ended session");
            return TickOutcome::Inactive;
        }

        match &transition {
            Transition::Discarded => {}
            Transition::Armed { start } => {
                info!(latitude = start.latitude, longitude = start.longitude, "trip armed");
                self.announce(*start);
            }
            Transition::DestinationReached { distance, .. } => {
                info!(distance, "destination zone reached");
            }
            Transition::Returned { distance, .. } => {
                info!(distance, "returned to start, trip tracking stopped");
            }
            Transition::Unchanged { distance } => {
                debug!(distance, "no geofence transition");
            }
            Transition::Skipped => {
                debug!("unusable fix, skipping tick");
            }
        }

        if let Some(notification) = transition.notification() {
            self.present(notification.clone()).await;
        }
        if transition.ends_session() {
            self.post(WorkerMessage::StopTracking).await;
        }

        TickOutcome::Applied(transition)
    }

    /// Stop the trip. Returns whether a session was active.
    pub async fn stop(&self) -> bool {
        let was_active = self.machine.lock().stop();
        if was_active {
            info!("trip tracking stopped");
            self.post(WorkerMessage::StopTracking).await;
        }
        was_active
    }

    /// React to a message the worker sent to this foreground context.
    ///
    /// Returns `true` when the message ended the local session.
    pub fn handle_worker_message(&self, message: &WorkerMessage) -> bool {
        match message {
            WorkerMessage::StopTracking => {
                // The worker already cleared its own flag; no echo.
                let was_active = self.machine.lock().stop();
                if was_active {
                    info!("trip tracking stopped from notification");
                }
                was_active
            }
            WorkerMessage::NotificationClicked { action, .. } => {
                debug!(action = ?action, "notification clicked");
                false
            }
            other => {
                debug!(kind = other.kind(), "ignoring worker message");
                false
            }
        }
    }

    async fn present(&self, request: NotificationRequest) {
        let tag = request.tag.clone();
        if let Err(err) = self.channel.notify(request).await {
            warn!(error = %err, tag = %tag, "failed to present notification");
        }
    }

    async fn post(&self, message: WorkerMessage) {
        let kind = message.kind();
        if let Err(err) = self.worker.post(message).await {
            warn!(error = %err, kind, "failed to message background worker");
        }
    }

    fn announce(&self, start: Coordinate) {
        let Some(announcer) = self.announcer.clone() else {
            return;
        };
        tokio::spawn(async move {
            if let Err(err) = announcer.trip_started(start).await {
                warn!(error = %err, "trip start announcement failed");
            }
        });
    }
}
