//! Trip geofence state machine
//!
//! `Idle → Armed → Departed → Returned → Idle`. The machine owns the single
//! [`TrackingSession`] and is driven one sample at a time; it never samples,
//! sleeps or presents anything itself.
//!
//! Every started session gets a new generation number. Samples are tagged
//! with the generation they were requested under so that a fix resolving
//! after `stop` (or after a restart) is discarded instead of being applied to
//! the wrong session.

use spotsurfer_domain::{
    Coordinate, DestinationZone, NotificationPreset, NotificationRequest, Result, SpotSurferError,
    TrackingConfig, TrackingSession, TripPhase,
};

use crate::geo::distance::distance;

/// Thresholds and destination policy for one machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeofencePolicy {
    depart_threshold: f64,
    return_threshold: f64,
    destination: DestinationZone,
}

impl GeofencePolicy {
    /// # Errors
    /// Returns `SpotSurferError::Config` unless
    /// `0 < return_threshold < depart_threshold`.
    pub fn new(
        depart_threshold: f64,
        return_threshold: f64,
        destination: DestinationZone,
    ) -> Result<Self> {
        let valid = depart_threshold.is_finite()
            && return_threshold.is_finite()
            && return_threshold > 0.0
            && return_threshold < depart_threshold;
        if !valid {
            return Err(SpotSurferError::Config(format!(
                "geofence thresholds need 0 < return ({return_threshold}) < depart ({depart_threshold})"
            )));
        }
        Ok(Self { depart_threshold, return_threshold, destination })
    }

    /// Build the policy from the tracking section of the config.
    pub fn from_config(config: &TrackingConfig) -> Result<Self> {
        Self::new(config.depart_threshold, config.return_threshold, config.destination)
    }

    /// Distance in degrees that counts as reaching the destination zone.
    pub fn depart_threshold(&self) -> f64 {
        self.depart_threshold
    }

    /// Distance in degrees from the start that counts as being back home.
    pub fn return_threshold(&self) -> f64 {
        self.return_threshold
    }

    fn in_destination_zone(&self, start: Coordinate, current: Coordinate) -> (bool, f64) {
        match self.destination.anchor() {
            None => {
                let d = distance(start, current);
                (d > self.depart_threshold, d)
            }
            Some(anchor) => {
                let d = distance(anchor, current);
                (d < self.depart_threshold, d)
            }
        }
    }
}

impl Default for GeofencePolicy {
    fn default() -> Self {
        let config = TrackingConfig::default();
        Self {
            depart_threshold: config.depart_threshold,
            return_threshold: config.return_threshold,
            destination: config.destination,
        }
    }
}

/// Result of feeding one sample to the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// No live session, or the sample belongs to an older session.
    Discarded,
    /// The sample was not a usable fix; the tick is skipped.
    Skipped,
    /// First fix of the session became the start coordinate.
    Armed { start: Coordinate },
    /// Nothing changed. `distance` is measured for the pending check.
    Unchanged { distance: f64 },
    DestinationReached { distance: f64, notification: NotificationRequest },
    /// The session has ended and been reset.
    Returned { distance: f64, notification: NotificationRequest },
}

impl Transition {
    pub fn notification(&self) -> Option<&NotificationRequest> {
        match self {
            Self::DestinationReached { notification, .. } | Self::Returned { notification, .. } => {
                Some(notification)
            }
            _ => None,
        }
    }

    pub fn ends_session(&self) -> bool {
        matches!(self, Self::Returned { .. })
    }
}

/// Holds the live session and applies geofence transitions to it.
#[derive(Debug, Clone, Default)]
pub struct TrackingStateMachine {
    policy: GeofencePolicy,
    session: TrackingSession,
    generation: u64,
}

impl TrackingStateMachine {
    pub fn new(policy: GeofencePolicy) -> Self {
        Self { policy, session: TrackingSession::default(), generation: 0 }
    }

    pub fn policy(&self) -> &GeofencePolicy {
        &self.policy
    }

    pub fn session(&self) -> &TrackingSession {
        &self.session
    }

    pub fn phase(&self) -> TripPhase {
        self.session.phase()
    }

    pub fn is_active(&self) -> bool {
        self.session.active
    }

    /// Generation of the current (or most recently ended) session.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a session. Returns `false` and leaves the live session untouched
    /// when one is already active.
    pub fn start(&mut self) -> bool {
        if self.session.active {
            return false;
        }
        self.generation += 1;
        self.session = TrackingSession::started();
        true
    }

    /// Stop and reset the session. Returns whether one was active.
    pub fn stop(&mut self) -> bool {
        let was_active = self.session.active;
        self.end_session();
        was_active
    }

    /// Feed a sample taken for the current session.
    pub fn observe(&mut self, current: Coordinate) -> Transition {
        self.observe_for(self.generation, current)
    }

    /// Feed a sample requested while `generation` was current.
    pub fn observe_for(&mut self, generation: u64, current: Coordinate) -> Transition {
        if !self.session.active || generation != self.generation {
            return Transition::Discarded;
        }
        if !current.is_valid() {
            return Transition::Skipped;
        }

        let Some(start) = self.session.start_coordinate else {
            self.session.start_coordinate = Some(current);
            return Transition::Armed { start: current };
        };

        if !self.session.destination_reached {
            let (reached, d) = self.policy.in_destination_zone(start, current);
            if reached {
                self.session.destination_reached = true;
                return Transition::DestinationReached {
                    distance: d,
                    notification: NotificationRequest::preset(
                        NotificationPreset::DestinationReached,
                    ),
                };
            }
            return Transition::Unchanged { distance: d };
        }

        let d = distance(start, current);
        if !self.session.return_notified && d < self.policy.return_threshold {
            self.session.return_notified = true;
            self.end_session();
            return Transition::Returned {
                distance: d,
                notification: NotificationRequest::preset(NotificationPreset::WelcomeBack),
            };
        }
        Transition::Unchanged { distance: d }
    }

    fn end_session(&mut self) {
        if self.session.active {
            // Anything still in flight for this session becomes stale.
            self.generation += 1;
        }
        self.session.reset();
    }
}
