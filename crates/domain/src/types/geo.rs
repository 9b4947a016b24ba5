//! Geolocation types

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAXIMUM_AGE_MS, DEFAULT_SAMPLE_TIMEOUT_MS};

/// A recorded position fix in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// True when both components are finite and within WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Options forwarded to a one-shot position query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleOptions {
    pub enable_high_accuracy: bool,
    pub timeout_ms: u64,
    pub maximum_age_ms: u64,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout_ms: DEFAULT_SAMPLE_TIMEOUT_MS,
            maximum_age_ms: DEFAULT_MAXIMUM_AGE_MS,
        }
    }
}

/// Where the destination zone lies.
///
/// `LeaveStart` treats anything farther than the depart threshold from the
/// session's first fix as the destination zone. `Around` places the zone
/// within the depart threshold of a configured point. The return check is
/// always measured against the first fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DestinationZone {
    #[default]
    LeaveStart,
    Around { latitude: f64, longitude: f64 },
}

impl DestinationZone {
    /// The configured centre, if the zone is anchored to a fixed point.
    pub fn anchor(&self) -> Option<Coordinate> {
        match *self {
            Self::LeaveStart => None,
            Self::Around { latitude, longitude } => Some(Coordinate::new(latitude, longitude)),
        }
    }
}
