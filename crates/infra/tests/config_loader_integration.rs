//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::path::PathBuf;

use spotsurfer_domain::{DestinationZone, SpotSurferError};
use spotsurfer_infra::config;
use tempfile::TempDir;

fn write_config(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("Failed to write config file");
    path
}

#[test]
fn test_load_config_from_json_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(
        &dir,
        "spotsurfer.json",
        r#"{
            "tracking": {
                "sample_interval_ms": 5000,
                "depart_threshold": 0.01,
                "return_threshold": 0.003,
                "destination": { "kind": "around", "latitude": 39.6404, "longitude": -106.3742 }
            },
            "server": {
                "base_url": "https://assistant.example.com",
                "language": "es"
            },
            "push": { "enabled": false }
        }"#,
    );

    let config = config::load_from_file(Some(path)).expect("Failed to load config from JSON file");

    assert_eq!(config.tracking.sample_interval_ms, 5000);
    assert_eq!(config.tracking.depart_threshold, 0.01);
    assert_eq!(
        config.tracking.destination,
        DestinationZone::Around { latitude: 39.6404, longitude: -106.3742 }
    );
    assert_eq!(config.server.base_url, "https://assistant.example.com");
    assert_eq!(config.server.language.as_deref(), Some("es"));
    assert!(!config.push.enabled);
    // Untouched sections keep their defaults
    assert!(config.server.announce_start);
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_config_from_toml_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(
        &dir,
        "spotsurfer.toml",
        r#"
[tracking]
sample_interval_ms = 2000
notify_on_start = false

[tracking.destination]
kind = "leave_start"

[notifications]
app_url = "/trips"
"#,
    );

    let config = config::load_from_file(Some(path)).expect("Failed to load config from TOML file");

    assert_eq!(config.tracking.sample_interval_ms, 2000);
    assert!(!config.tracking.notify_on_start);
    assert_eq!(config.tracking.destination, DestinationZone::LeaveStart);
    assert_eq!(config.notifications.app_url, "/trips");
}

#[test]
fn test_load_config_from_nonexistent_file() {
    let result = config::load_from_file(Some("/nonexistent/path/spotsurfer.json".into()));

    match result {
        Err(SpotSurferError::Config(msg)) => {
            assert!(msg.contains("not found"), "Error message should mention 'not found'");
        }
        other => panic!("Expected Config error, got {other:?}"),
    }
}

#[test]
fn test_load_config_with_invalid_format() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(&dir, "spotsurfer.json", r#"{ "this is": "not valid" "#);

    match config::load_from_file(Some(path)) {
        Err(SpotSurferError::Config(msg)) => {
            assert!(msg.contains("Invalid JSON"), "Error message should mention invalid JSON");
        }
        other => panic!("Expected Config error, got {other:?}"),
    }
}

#[test]
fn test_file_values_load_even_when_invalid() {
    // Validation happens after env overrides, not while reading the file.
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(
        &dir,
        "spotsurfer.json",
        r#"{ "tracking": { "depart_threshold": 0.001, "return_threshold": 0.002 } }"#,
    );

    let config = config::load_from_file(Some(path)).expect("File should parse");
    assert!(matches!(config.validate(), Err(SpotSurferError::Config(_))));
}
