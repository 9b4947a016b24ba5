//! Planar distance over raw degrees
//!
//! The Euclidean norm of the latitude/longitude differences. It ignores the
//! Earth's curvature and the shrinking of longitude degrees away from the
//! equator, so it only holds up over a few kilometres. Geofence thresholds are
//! expressed in the same degree units.

use spotsurfer_domain::Coordinate;

/// Distance between two fixes in degrees. Symmetric, zero on identical
/// inputs, no failure mode.
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    (a.latitude - b.latitude).hypot(a.longitude - b.longitude)
}
