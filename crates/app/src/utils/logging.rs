//! Tracing setup and structured log helpers

use spotsurfer_core::StartReport;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const ENV_LOG: &str = "SPOTSURFER_LOG";
const ENV_LOG_FORMAT: &str = "SPOTSURFER_LOG_FORMAT";
const DEFAULT_DIRECTIVES: &str = "info";

type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Install the global subscriber.
///
/// Filter directives come from `SPOTSURFER_LOG`, then `RUST_LOG`, then
/// `info`. `SPOTSURFER_LOG_FORMAT=json` switches to JSON lines. Output goes
/// to stderr.
///
/// # Errors
/// Fails if a global subscriber is already installed.
pub fn init_tracing() -> Result<(), InitError> {
    let filter = std::env::var(ENV_LOG)
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES));

    let json = std::env::var(ENV_LOG_FORMAT).is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
}

/// Log how a trip start went.
pub fn log_start_report(report: &StartReport) {
    if !report.started {
        warn!(generation = report.generation, "trip was not started");
        return;
    }
    match report.start_coordinate {
        Some(start) => info!(
            generation = report.generation,
            latitude = start.latitude,
            longitude = start.longitude,
            "trip started"
        ),
        None => info!(generation = report.generation, "trip started, waiting for first fix"),
    }
    if let Some(err) = &report.push_error {
        warn!(error = %err, kind = err.label(), "trip running without push notifications");
    }
}
