//! Port interface for position sampling

use async_trait::async_trait;
use spotsurfer_domain::{Coordinate, Result, SampleOptions};

/// One-shot position query against the platform.
///
/// Failures are `PermissionDenied`, `PositionUnavailable` or `Timeout`. A
/// result that resolves after its session has stopped is discarded by the
/// caller; implementations cannot cancel an in-flight query.
#[async_trait]
pub trait GeoSampler: Send + Sync {
    async fn sample_once(&self, options: &SampleOptions) -> Result<Coordinate>;
}
