//! Integration tests for AppContext lifecycle
//!
//! Runs whole trips through the wired-up context: foreground service,
//! sampler, worker runtime, push registration and the assistant endpoint.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use spotsurfer_core::{GeoSampler, WorkerEvent, WorkerState, WorkerStateStore};
use spotsurfer_domain::constants::ACTION_STOP;
use spotsurfer_domain::{
    Config, Coordinate, NotificationPreset, NotificationRequest, SampleOptions, SpotSurferError,
};
use spotsurfer_infra::{InMemoryStateStore, ReplayGeoSampler};
use spotsurfer_lib::AppContext;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const START: Coordinate = Coordinate::new(39.6277, -106.5013);

fn round_trip() -> Vec<Coordinate> {
    vec![
        START,
        Coordinate::new(39.6290, -106.5013),
        Coordinate::new(39.6330, -106.5013),
        Coordinate::new(39.6330, -106.5013),
        Coordinate::new(39.6278, -106.5013),
    ]
}

fn fast_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.server.base_url = base_url.to_string();
    config.tracking.sample_interval_ms = 10;
    config
}

fn offline_config() -> Config {
    let mut config = fast_config("http://127.0.0.1:9");
    config.push.enabled = false;
    config.server.announce_start = false;
    config
}

/// Stays at the start; the second fix takes long enough to span a stop.
#[derive(Default)]
struct SlowSecondFix {
    calls: AtomicUsize,
}

impl SlowSecondFix {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeoSampler for SlowSecondFix {
    async fn sample_once(&self, _options: &SampleOptions) -> spotsurfer_domain::Result<Coordinate> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 1 {
            tokio::time::sleep(Duration::from_millis(400)).await;
        }
        Ok(START)
    }
}

async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

#[tokio::test(flavor = "multi_thread")]
async fn test_full_trip_notifies_registers_and_announces() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/subscribe"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "Have a great trip"
        })))
        .mount(&server)
        .await;

    let ctx = AppContext::new(fast_config(&server.uri()), Arc::new(ReplayGeoSampler::new(round_trip())))
        .await
        .expect("context should build");

    let report = ctx.start_trip().await.expect("trip should start");
    assert!(report.started);
    assert_eq!(report.start_coordinate, Some(START));
    assert!(report.push_error.is_none());

    tokio::time::timeout(Duration::from_secs(5), ctx.wait_for_trip())
        .await
        .expect("trip should end on its own")
        .expect("sampler should wind down cleanly");
    assert!(!ctx.tracking_service.is_active());

    let presenter = ctx.presenter.clone();
    assert!(eventually(|| presenter.history().len() == 3).await);
    let titles: Vec<_> = presenter.history().into_iter().map(|n| n.title).collect();
    assert_eq!(titles, vec!["🚗 Trip Started", "📍 Destination Reached", "🏠 Welcome Back"]);

    let push = ctx.push.clone().expect("push is enabled by default");
    assert!(push.is_registered().await);

    let mut asked = Vec::new();
    for _ in 0..100 {
        asked = server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() == "/ask")
            .collect();
        if !asked.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(asked.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&asked[0].body).unwrap();
    assert_eq!(body["intent"], "trip-start");
    assert_eq!(body["lat"], START.latitude);

    ctx.shutdown().await;
    assert!(!ctx.worker.is_running());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_registration_failure_does_not_block_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/subscribe"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut config = fast_config(&server.uri());
    config.server.announce_start = false;
    let ctx = AppContext::new(config, Arc::new(ReplayGeoSampler::new(round_trip())))
        .await
        .expect("context should build");

    let report = ctx.start_trip().await.expect("trip should start");
    assert!(report.started);
    assert!(matches!(report.push_error, Some(SpotSurferError::Network(_))));

    let push = ctx.push.clone().expect("push enabled");
    assert!(push.current().await.is_some(), "subscription is kept after a failed registration");
    assert!(!push.is_registered().await);

    ctx.shutdown().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stop_action_from_notification_ends_trip() {
    // Never leaves the start area, so only a stop can end it.
    let track = std::iter::repeat(START).take(1_000);
    let store = Arc::new(InMemoryStateStore::new());
    let ctx = AppContext::with_state_store(
        offline_config(),
        Arc::new(ReplayGeoSampler::new(track)),
        store.clone(),
    )
    .await
    .expect("context should build");

    ctx.start_trip().await.expect("trip should start");
    assert!(ctx.tracking_service.is_active());

    ctx.worker
        .dispatch(WorkerEvent::NotificationClick {
            action: Some(ACTION_STOP.into()),
            notification: NotificationRequest::preset(NotificationPreset::TripStarted),
        })
        .expect("worker should accept the click");

    tokio::time::timeout(Duration::from_secs(5), ctx.wait_for_trip())
        .await
        .expect("stop should end the trip")
        .expect("sampler should wind down cleanly");
    assert!(!ctx.tracking_service.is_active());
    assert_eq!(store.load().await.unwrap(), Some(WorkerState { tracking_active: false }));

    ctx.shutdown().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_restart_after_stop_click_mid_sample_keeps_sampling() {
    let sampler = Arc::new(SlowSecondFix::default());
    let ctx = AppContext::new(offline_config(), sampler.clone()).await.expect("context should build");

    assert!(ctx.start_trip().await.unwrap().started);
    // Let the first tick get stuck on the slow fix.
    tokio::time::sleep(Duration::from_millis(100)).await;

    ctx.worker
        .dispatch(WorkerEvent::NotificationClick {
            action: Some(ACTION_STOP.into()),
            notification: NotificationRequest::preset(NotificationPreset::TripStarted),
        })
        .expect("worker should accept the click");
    let service = ctx.tracking_service.clone();
    assert!(eventually(|| !service.is_active()).await);

    assert!(ctx.start_trip().await.unwrap().started);
    let before = sampler.calls();
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(ctx.tracking_service.is_active());
    assert!(sampler.calls() > before, "restarted trip is being sampled");

    ctx.shutdown().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_foreground_stop_and_restart() {
    let mut config = offline_config();
    config.tracking.sample_interval_ms = 60_000;
    let ctx = AppContext::new(config, Arc::new(ReplayGeoSampler::new([START, START])))
        .await
        .expect("context should build");

    assert!(ctx.start_trip().await.unwrap().started);
    assert!(!ctx.start_trip().await.unwrap().started, "second start is a no-op");

    assert!(ctx.stop_trip().await.unwrap());
    assert!(!ctx.stop_trip().await.unwrap());

    let report = ctx.start_trip().await.unwrap();
    assert!(report.started);
    assert_eq!(report.start_coordinate, Some(START));

    ctx.shutdown().await;
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let mut config = offline_config();
    config.tracking.return_threshold = config.tracking.depart_threshold;

    let result = AppContext::new(config, Arc::new(ReplayGeoSampler::default())).await;
    assert!(matches!(result, Err(SpotSurferError::Config(_))));
}

#[tokio::test]
async fn test_relative_server_url_is_rejected() {
    let mut config = offline_config();
    config.server.base_url = "not a url".into();

    let result = AppContext::new(config, Arc::new(ReplayGeoSampler::default())).await;
    assert!(matches!(result, Err(SpotSurferError::Config(_))));
}
