//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application. Geofence radii are in raw coordinate degrees.

// Geofence defaults
pub const DEFAULT_DEPART_THRESHOLD: f64 = 0.005;
pub const DEFAULT_RETURN_THRESHOLD: f64 = 0.002;

// Sampling defaults
pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 10_000;
pub const DEFAULT_SAMPLE_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MAXIMUM_AGE_MS: u64 = 0;

// Notification tags (dedup keys)
pub const TAG_TRIP_TRACKING: &str = "trip-tracking";
pub const TAG_PUSH_NOTIFICATION: &str = "push-notification";
pub const TAG_MANUAL_NOTIFICATION: &str = "manual-notification";

/// Background and periodic sync registrations share this tag.
pub const SYNC_TAG_TRACKING: &str = "tracking-sync";

// Notification actions
pub const ACTION_STOP: &str = "stop";
pub const ACTION_STOP_LABEL: &str = "Stop Tracking";
pub const ACTION_VIEW: &str = "view";
pub const ACTION_VIEW_LABEL: &str = "Open App";

// Presentation defaults
pub const DEFAULT_ICON: &str = "/icons/icon-192.png";
pub const DEFAULT_APP_URL: &str = "/";
pub const DEFAULT_PUSH_TITLE: &str = "📍 SpotSurfer Update";
pub const DEFAULT_PUSH_BODY: &str = "New update from SpotSurfer";

// Remote endpoints
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5555";
pub const ASK_PATH: &str = "/ask";
pub const SUBSCRIBE_PATH: &str = "/subscribe";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
