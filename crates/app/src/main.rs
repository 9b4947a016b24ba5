//! SpotSurfer - headless trip tracker
//!
//! `spotsurfer [TRACK_FILE]` replays a JSON array of `{latitude, longitude}`
//! fixes (or the bundled demo track) through the foreground tracking service
//! and the background worker, and exits when the trip ends or on Ctrl-C.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use spotsurfer_domain::Coordinate;
use spotsurfer_infra::{config, JsonFileStateStore, ReplayGeoSampler};
use spotsurfer_lib::utils::logging;
use spotsurfer_lib::AppContext;
use tracing::{debug, info, warn};

const DEMO_TRACK: &str = include_str!("../assets/demo_track.json");

/// Optional path for persisting the worker's tracking flag across runs.
const ENV_STATE_FILE: &str = "SPOTSURFER_STATE_FILE";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before tracing so SPOTSURFER_LOG can live there
    let dotenv = dotenvy::dotenv();
    logging::init_tracing().map_err(|err| anyhow::anyhow!(err))?;
    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(err) => debug!(error = %err, "no .env loaded"),
    }

    let config = config::load().context("failed to load configuration")?;
    let sampler = Arc::new(load_track().await?);

    let ctx = match std::env::var_os(ENV_STATE_FILE) {
        Some(path) => {
            let store = Arc::new(JsonFileStateStore::new(PathBuf::from(path)));
            AppContext::with_state_store(config, sampler.clone(), store).await?
        }
        None => AppContext::new(config, sampler.clone()).await?,
    };

    let report = match ctx.start_trip().await {
        Ok(report) => report,
        Err(err) => {
            ctx.shutdown().await;
            return Err(err).context("trip did not start");
        }
    };
    logging::log_start_report(&report);

    tokio::select! {
        result = ctx.wait_for_trip() => result?,
        signal = tokio::signal::ctrl_c() => {
            if let Err(err) = signal {
                warn!(error = %err, "failed to listen for Ctrl-C");
            }
            info!("interrupted, stopping trip");
            ctx.stop_trip().await?;
        }
    }

    info!(
        samples = sampler.consumed(),
        notifications = ctx.presenter.history().len(),
        "trip finished"
    );
    ctx.shutdown().await;
    Ok(())
}

async fn load_track() -> anyhow::Result<ReplayGeoSampler> {
    match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => ReplayGeoSampler::from_json_file(&path)
            .await
            .with_context(|| format!("failed to read track {}", path.display())),
        None => {
            let fixes: Vec<Coordinate> =
                serde_json::from_str(DEMO_TRACK).context("bundled demo track is invalid")?;
            info!(fixes = fixes.len(), "replaying bundled demo track");
            Ok(ReplayGeoSampler::new(fixes))
        }
    }
}
