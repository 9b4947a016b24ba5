//! Port interfaces for trip tracking side effects

use async_trait::async_trait;
use spotsurfer_domain::{Coordinate, Result};

/// Tells the remote assistant that a trip has started.
///
/// Best-effort: failures are logged by the caller and never affect the
/// session.
#[async_trait]
pub trait TripAnnouncer: Send + Sync {
    async fn trip_started(&self, start: Coordinate) -> Result<()>;
}
