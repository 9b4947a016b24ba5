//! Trip session state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::geo::Coordinate;
use crate::impl_domain_status_conversions;

/// Coarse phase of the trip state machine, derived from [`TrackingSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripPhase {
    Idle,
    Armed,
    Departed,
    /// Terminal; the session resets to `Idle` immediately afterwards.
    Returned,
}

impl_domain_status_conversions!(TripPhase {
    Idle => "idle",
    Armed => "armed",
    Departed => "departed",
    Returned => "returned",
});

/// The single live trip session of a device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingSession {
    pub start_coordinate: Option<Coordinate>,
    pub destination_reached: bool,
    pub return_notified: bool,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}

impl TrackingSession {
    /// A freshly started session waiting for its first fix.
    pub fn started() -> Self {
        Self { active: true, started_at: Some(Utc::now()), ..Self::default() }
    }

    /// Reset to unset/false/false/false.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn phase(&self) -> TripPhase {
        if !self.active {
            return TripPhase::Idle;
        }
        match (self.destination_reached, self.return_notified) {
            (_, true) => TripPhase::Returned,
            (true, false) => TripPhase::Departed,
            (false, false) => TripPhase::Armed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_session_is_idle() {
        let session = TrackingSession::default();
        assert!(!session.active);
        assert!(session.start_coordinate.is_none());
        assert_eq!(session.phase(), TripPhase::Idle);
    }

    #[test]
    fn phases_follow_flags() {
        let mut session = TrackingSession::started();
        assert_eq!(session.phase(), TripPhase::Armed);

        session.start_coordinate = Some(Coordinate::new(1.0, 1.0));
        session.destination_reached = true;
        assert_eq!(session.phase(), TripPhase::Departed);

        session.reset();
        assert_eq!(session, TrackingSession::default());
    }

    #[test]
    fn phase_round_trips_through_strings() {
        assert_eq!("DEPARTED".parse::<TripPhase>().unwrap(), TripPhase::Departed);
        assert_eq!(TripPhase::Armed.to_string(), "armed");
    }
}
