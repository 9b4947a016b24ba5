//! Worker state stores

use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::Mutex;
use spotsurfer_core::{WorkerState, WorkerStateStore};
use spotsurfer_domain::Result;
use tracing::debug;

use crate::errors::InfraError;

/// Keeps state for the life of the process only.
#[derive(Default)]
pub struct InMemoryStateStore {
    state: Mutex<Option<WorkerState>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WorkerStateStore for InMemoryStateStore {
    async fn load(&self) -> Result<Option<WorkerState>> {
        Ok(*self.state.lock())
    }

    async fn save(&self, state: &WorkerState) -> Result<()> {
        *self.state.lock() = Some(*state);
        Ok(())
    }
}

/// Persists state as a small JSON document.
pub struct JsonFileStateStore {
    path: PathBuf,
}

impl JsonFileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl WorkerStateStore for JsonFileStateStore {
    async fn load(&self) -> Result<Option<WorkerState>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(InfraError::from(err).into()),
        };
        let state = serde_json::from_slice(&raw).map_err(InfraError::from)?;
        Ok(Some(state))
    }

    async fn save(&self, state: &WorkerState) -> Result<()> {
        let raw = serde_json::to_vec(state).map_err(InfraError::from)?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(InfraError::from)?;
        }
        tokio::fs::write(&self.path, raw).await.map_err(InfraError::from)?;
        debug!(path = %self.path.display(), "worker state saved");
        Ok(())
    }
}
