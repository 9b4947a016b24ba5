//! Geo sampler that replays a recorded track.

use std::collections::VecDeque;
use std::path::Path;

use async_trait::async_trait;
use parking_lot::Mutex;
use spotsurfer_core::GeoSampler;
use spotsurfer_domain::{Coordinate, Result, SampleOptions, SpotSurferError};
use tracing::debug;

use crate::errors::InfraError;

#[derive(Default)]
struct Track {
    pending: VecDeque<Coordinate>,
    consumed: usize,
}

/// Hands out one recorded fix per sample. Once the track runs out every
/// sample reports the position as unavailable.
#[derive(Default)]
pub struct ReplayGeoSampler {
    track: Mutex<Track>,
}

impl ReplayGeoSampler {
    pub fn new(fixes: impl IntoIterator<Item = Coordinate>) -> Self {
        Self { track: Mutex::new(Track { pending: fixes.into_iter().collect(), consumed: 0 }) }
    }

    /// Load a JSON array of `{latitude, longitude}` objects.
    ///
    /// # Errors
    /// Returns `Internal` if the file cannot be read and `InvalidInput` if it
    /// is not a coordinate array.
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = tokio::fs::read(path.as_ref()).await.map_err(InfraError::from)?;
        let fixes: Vec<Coordinate> = serde_json::from_slice(&raw).map_err(InfraError::from)?;
        debug!(path = %path.as_ref().display(), fixes = fixes.len(), "loaded track");
        Ok(Self::new(fixes))
    }

    pub fn remaining(&self) -> usize {
        self.track.lock().pending.len()
    }

    /// Number of samples taken so far.
    pub fn consumed(&self) -> usize {
        self.track.lock().consumed
    }
}

#[async_trait]
impl GeoSampler for ReplayGeoSampler {
    async fn sample_once(&self, _options: &SampleOptions) -> Result<Coordinate> {
        let mut track = self.track.lock();
        track.consumed += 1;
        track
            .pending
            .pop_front()
            .ok_or_else(|| SpotSurferError::PositionUnavailable("recorded track exhausted".into()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[tokio::test]
    async fn replays_in_order_then_reports_unavailable() {
        let sampler =
            ReplayGeoSampler::new([Coordinate::new(1.0, 2.0), Coordinate::new(3.0, 4.0)]);
        let options = SampleOptions::default();

        assert_eq!(sampler.sample_once(&options).await.unwrap(), Coordinate::new(1.0, 2.0));
        assert_eq!(sampler.sample_once(&options).await.unwrap(), Coordinate::new(3.0, 4.0));
        assert!(matches!(
            sampler.sample_once(&options).await,
            Err(SpotSurferError::PositionUnavailable(_))
        ));
        assert_eq!(sampler.consumed(), 3);
    }

    #[tokio::test]
    async fn loads_track_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"[{"latitude":39.6277,"longitude":-106.5013}]"#).unwrap();

        let sampler = ReplayGeoSampler::from_json_file(file.path()).await.unwrap();
        assert_eq!(sampler.remaining(), 1);
    }

    #[tokio::test]
    async fn rejects_non_track_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{\"latitude\": 1}").unwrap();

        let err = ReplayGeoSampler::from_json_file(file.path()).await.err().unwrap();
        assert!(matches!(err, SpotSurferError::InvalidInput(_)));
    }
}
