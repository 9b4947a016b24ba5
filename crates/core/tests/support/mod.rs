//! Shared test helpers for `spotsurfer-core` integration tests.
//!
//! In-memory stand-ins for every port the tracking service touches, so the
//! tests can drive full trips without a platform.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use spotsurfer_core::{GeoSampler, NotificationChannel, TripAnnouncer, WorkerPort};
use spotsurfer_domain::{
    Coordinate, NotificationRequest, Result as DomainResult, SampleOptions, SpotSurferError,
    WorkerMessage,
};
use tokio::sync::{mpsc, Notify};

/// Returns queued fixes in order; an empty queue reports the position as
/// unavailable.
#[derive(Default)]
pub struct ScriptedSampler {
    queue: Mutex<VecDeque<DomainResult<Coordinate>>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedSampler {
    pub fn new(fixes: impl IntoIterator<Item = Coordinate>) -> Self {
        Self { queue: Mutex::new(fixes.into_iter().map(Ok).collect()), gate: None }
    }

    /// Every sample waits for `gate` to be notified before resolving.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn push(&self, result: DomainResult<Coordinate>) {
        self.queue.lock().push_back(result);
    }
}

#[async_trait]
impl GeoSampler for ScriptedSampler {
    async fn sample_once(&self, _options: &SampleOptions) -> DomainResult<Coordinate> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.queue.lock().pop_front().unwrap_or_else(|| {
            Err(SpotSurferError::PositionUnavailable("no fix scripted".into()))
        })
    }
}

/// Records every request it is asked to present.
#[derive(Default)]
pub struct RecordingChannel {
    pub requests: Mutex<Vec<NotificationRequest>>,
}

impl RecordingChannel {
    pub fn titles(&self) -> Vec<String> {
        self.requests.lock().iter().map(|r| r.title.clone()).collect()
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    async fn notify(&self, request: NotificationRequest) -> DomainResult<()> {
        self.requests.lock().push(request);
        Ok(())
    }
}

/// Records every message posted to the worker.
#[derive(Default)]
pub struct RecordingWorker {
    pub messages: Mutex<Vec<WorkerMessage>>,
}

impl RecordingWorker {
    pub fn kinds(&self) -> Vec<&'static str> {
        self.messages.lock().iter().map(WorkerMessage::kind).collect()
    }
}

#[async_trait]
impl WorkerPort for RecordingWorker {
    async fn post(&self, message: WorkerMessage) -> DomainResult<()> {
        self.messages.lock().push(message);
        Ok(())
    }
}

/// Forwards announced start coordinates to a channel.
pub struct ChannelAnnouncer {
    tx: mpsc::UnboundedSender<Coordinate>,
}

impl ChannelAnnouncer {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Coordinate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl TripAnnouncer for ChannelAnnouncer {
    async fn trip_started(&self, start: Coordinate) -> DomainResult<()> {
        self.tx
            .send(start)
            .map_err(|_| SpotSurferError::Internal("announcement receiver dropped".into()))
    }
}

pub const START: Coordinate = Coordinate::new(39.6277, -106.5013);

/// The documented trip: a short hop, past the depart radius twice, then home.
pub fn scenario_track() -> Vec<Coordinate> {
    vec![
        START,
        Coordinate::new(39.6290, -106.5013),
        Coordinate::new(39.6330, -106.5013),
        Coordinate::new(39.6330, -106.5013),
        Coordinate::new(39.6278, -106.5013),
    ]
}
