//! In-process client registry
//!
//! Foreground contexts running in the same process attach with
//! [`LocalClientRegistry::connect`] and receive worker messages on the
//! returned channel.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use spotsurfer_core::{ClientInfo, ClientKind, ClientRegistry};
use spotsurfer_domain::{Result, SpotSurferError, WorkerMessage};
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

struct ClientEntry {
    info: ClientInfo,
    /// `None` for windows the worker opened itself.
    sender: Option<mpsc::UnboundedSender<WorkerMessage>>,
}

#[derive(Default)]
struct Registry {
    clients: BTreeMap<String, ClientEntry>,
    focused: Option<String>,
}

/// A foreground context's end of the worker channel.
pub struct ClientConnection {
    pub info: ClientInfo,
    pub messages: mpsc::UnboundedReceiver<WorkerMessage>,
}

#[derive(Default)]
pub struct LocalClientRegistry {
    inner: Mutex<Registry>,
}

impl LocalClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a window client at `url`. It stays uncontrolled until the
    /// worker claims clients.
    pub fn connect(&self, url: impl Into<String>) -> ClientConnection {
        let (tx, rx) = mpsc::unbounded_channel();
        let info = ClientInfo {
            id: Uuid::new_v4().to_string(),
            url: url.into(),
            kind: ClientKind::Window,
            controlled: false,
        };
        self.inner
            .lock()
            .clients
            .insert(info.id.clone(), ClientEntry { info: info.clone(), sender: Some(tx) });
        debug!(client = %info.id, url = %info.url, "client connected");
        ClientConnection { info, messages: rx }
    }

    pub fn disconnect(&self, client_id: &str) {
        let mut inner = self.inner.lock();
        inner.clients.remove(client_id);
        if inner.focused.as_deref() == Some(client_id) {
            inner.focused = None;
        }
    }

    pub fn focused(&self) -> Option<String> {
        self.inner.lock().focused.clone()
    }

    pub fn clients(&self) -> Vec<ClientInfo> {
        self.inner.lock().clients.values().map(|entry| entry.info.clone()).collect()
    }
}

#[async_trait]
impl ClientRegistry for LocalClientRegistry {
    async fn match_all(&self, include_uncontrolled: bool) -> Result<Vec<ClientInfo>> {
        Ok(self
            .inner
            .lock()
            .clients
            .values()
            .filter(|entry| include_uncontrolled || entry.info.controlled)
            .map(|entry| entry.info.clone())
            .collect())
    }

    async fn post_message(&self, client_id: &str, message: &WorkerMessage) -> Result<()> {
        let mut inner = self.inner.lock();
        let Some(entry) = inner.clients.get(client_id) else {
            return Err(SpotSurferError::InvalidInput(format!("unknown client {client_id}")));
        };
        let Some(sender) = &entry.sender else {
            debug!(client = client_id, "client has no message channel");
            return Ok(());
        };
        if sender.send(message.clone()).is_err() {
            inner.clients.remove(client_id);
            return Err(SpotSurferError::Internal(format!("client {client_id} went away")));
        }
        Ok(())
    }

    async fn focus(&self, client_id: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        if !inner.clients.contains_key(client_id) {
            return Err(SpotSurferError::InvalidInput(format!("unknown client {client_id}")));
        }
        inner.focused = Some(client_id.to_string());
        Ok(())
    }

    async fn open_window(&self, url: &str) -> Result<String> {
        let info = ClientInfo {
            id: Uuid::new_v4().to_string(),
            url: url.to_string(),
            kind: ClientKind::Window,
            controlled: true,
        };
        let id = info.id.clone();
        let mut inner = self.inner.lock();
        inner.clients.insert(id.clone(), ClientEntry { info, sender: None });
        inner.focused = Some(id.clone());
        Ok(id)
    }

    async fn claim(&self) -> Result<()> {
        for entry in self.inner.lock().clients.values_mut() {
            entry.info.controlled = true;
        }
        Ok(())
    }
}
