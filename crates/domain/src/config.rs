//! Configuration management

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_APP_URL, DEFAULT_DEPART_THRESHOLD, DEFAULT_ICON, DEFAULT_MAXIMUM_AGE_MS,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RETURN_THRESHOLD, DEFAULT_SAMPLE_INTERVAL_MS,
    DEFAULT_SAMPLE_TIMEOUT_MS, DEFAULT_SERVER_URL,
};
use crate::errors::{Result, SpotSurferError};
use crate::types::{DestinationZone, SampleOptions};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tracking: TrackingConfig,
    pub server: ServerConfig,
    pub notifications: NotificationConfig,
    pub push: PushConfig,
}

/// Trip tracking configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub sample_interval_ms: u64,
    /// Leaving this radius marks the destination zone as reached.
    pub depart_threshold: f64,
    /// Coming back within this radius of the start ends the trip. Must be
    /// smaller than `depart_threshold`.
    pub return_threshold: f64,
    pub destination: DestinationZone,
    pub high_accuracy: bool,
    pub sample_timeout_ms: u64,
    pub maximum_age_ms: u64,
    pub notify_on_start: bool,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            depart_threshold: DEFAULT_DEPART_THRESHOLD,
            return_threshold: DEFAULT_RETURN_THRESHOLD,
            destination: DestinationZone::default(),
            high_accuracy: true,
            sample_timeout_ms: DEFAULT_SAMPLE_TIMEOUT_MS,
            maximum_age_ms: DEFAULT_MAXIMUM_AGE_MS,
            notify_on_start: true,
        }
    }
}

impl TrackingConfig {
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn sample_options(&self) -> SampleOptions {
        SampleOptions {
            enable_high_accuracy: self.high_accuracy,
            timeout_ms: self.sample_timeout_ms,
            maximum_age_ms: self.maximum_age_ms,
        }
    }
}

/// Remote assistant server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    /// Fire `POST /ask` when a trip starts.
    pub announce_start: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            announce_start: true,
            language: None,
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Notification presentation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// URL focused or opened when a notification is clicked.
    pub app_url: String,
    pub icon: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { app_url: DEFAULT_APP_URL.to_string(), icon: DEFAULT_ICON.to_string() }
    }
}

/// Push subscription configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    pub enabled: bool,
    /// Endpoint prefix handed out by the local push service.
    pub endpoint_base: String,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self { enabled: true, endpoint_base: "https://push.spotsurfer.local/send".to_string() }
    }
}

impl Config {
    /// Check invariants serde cannot express.
    ///
    /// # Errors
    /// Returns `SpotSurferError::Config` when the thresholds do not form a
    /// hysteresis band or the sampling interval is zero.
    pub fn validate(&self) -> Result<()> {
        let tracking = &self.tracking;
        if !(tracking.depart_threshold.is_finite() && tracking.depart_threshold > 0.0) {
            return Err(SpotSurferError::Config(format!(
                "depart_threshold must be positive, got {}",
                tracking.depart_threshold
            )));
        }
        if !(tracking.return_threshold.is_finite() && tracking.return_threshold > 0.0) {
            return Err(SpotSurferError::Config(format!(
                "return_threshold must be positive, got {}",
                tracking.return_threshold
            )));
        }
        if tracking.return_threshold >= tracking.depart_threshold {
            return Err(SpotSurferError::Config(format!(
                "return_threshold ({}) must be smaller than depart_threshold ({})",
                tracking.return_threshold, tracking.depart_threshold
            )));
        }
        if tracking.sample_interval_ms == 0 {
            return Err(SpotSurferError::Config("sample_interval_ms must be non-zero".into()));
        }
        if self.server.base_url.trim().is_empty() {
            return Err(SpotSurferError::Config("server.base_url must not be empty".into()));
        }
        Ok(())
    }
}
