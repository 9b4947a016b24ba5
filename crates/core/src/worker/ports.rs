//! Port interfaces for the worker's platform surface

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use spotsurfer_domain::{Result, WorkerMessage};

use super::handler::WorkerState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientKind {
    Window,
    Worker,
}

/// A foreground context attached to (or visible from) the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub id: String,
    pub url: String,
    pub kind: ClientKind,
    /// Whether this worker currently controls the client.
    pub controlled: bool,
}

/// The set of foreground contexts the worker can reach.
#[async_trait]
pub trait ClientRegistry: Send + Sync {
    async fn match_all(&self, include_uncontrolled: bool) -> Result<Vec<ClientInfo>>;

    async fn post_message(&self, client_id: &str, message: &WorkerMessage) -> Result<()>;

    async fn focus(&self, client_id: &str) -> Result<()>;

    /// Open a new window at `url`, returning its id.
    async fn open_window(&self, url: &str) -> Result<String>;

    /// Take control of every uncontrolled client.
    async fn claim(&self) -> Result<()>;
}

/// What the worker explicitly persists between activations.
#[async_trait]
pub trait WorkerStateStore: Send + Sync {
    async fn load(&self) -> Result<Option<WorkerState>>;

    async fn save(&self, state: &WorkerState) -> Result<()>;
}
