//! Configuration loader
//!
//! Loads application configuration from files and environment variables.
//!
//! ## Loading Strategy
//! 1. Probe the standard locations for a config file (JSON or TOML)
//! 2. Fall back to [`Config::default`] when none exists
//! 3. Apply `SPOTSURFER_*` environment overrides on top
//! 4. Validate the result
//!
//! ## Environment Variables
//! - `SPOTSURFER_SERVER_URL`: Remote assistant base URL
//! - `SPOTSURFER_SAMPLE_INTERVAL_MS`: Sampling interval in milliseconds
//! - `SPOTSURFER_DEPART_THRESHOLD`: Destination-zone radius (degrees)
//! - `SPOTSURFER_RETURN_THRESHOLD`: Return radius (degrees)
//! - `SPOTSURFER_PUSH_ENABLED`: Whether to negotiate a push subscription
//! - `SPOTSURFER_NOTIFY_ON_START`: Whether to notify when a trip starts
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./spotsurfer.json` or `./spotsurfer.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use spotsurfer_domain::{Config, Result, SpotSurferError};

const ENV_SERVER_URL: &str = "SPOTSURFER_SERVER_URL";
const ENV_SAMPLE_INTERVAL_MS: &str = "SPOTSURFER_SAMPLE_INTERVAL_MS";
const ENV_DEPART_THRESHOLD: &str = "SPOTSURFER_DEPART_THRESHOLD";
const ENV_RETURN_THRESHOLD: &str = "SPOTSURFER_RETURN_THRESHOLD";
const ENV_PUSH_ENABLED: &str = "SPOTSURFER_PUSH_ENABLED";
const ENV_NOTIFY_ON_START: &str = "SPOTSURFER_NOTIFY_ON_START";

/// Load configuration: probed file (or defaults), then environment.
///
/// # Errors
/// Returns `SpotSurferError::Config` if:
/// - A config file exists but cannot be parsed
/// - An environment override has an invalid value
/// - The merged configuration fails [`Config::validate`]
pub fn load() -> Result<Config> {
    let mut config = match probe_config_paths() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("No config file found, using defaults");
            Config::default()
        }
    };

    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

/// Defaults plus environment overrides, without touching the filesystem.
///
/// # Errors
/// Returns `SpotSurferError::Config` for unparsable values or an invalid
/// resulting configuration.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();
    apply_env_overrides(&mut config)?;
    config.validate()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Overwrite fields of `config` for every `SPOTSURFER_*` variable that is set.
///
/// # Errors
/// Returns `SpotSurferError::Config` when a variable cannot be parsed.
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Some(url) = env_opt(ENV_SERVER_URL) {
        config.server.base_url = url;
    }
    if let Some(interval) = env_parse::<u64>(ENV_SAMPLE_INTERVAL_MS)? {
        config.tracking.sample_interval_ms = interval;
    }
    if let Some(depart) = env_parse::<f64>(ENV_DEPART_THRESHOLD)? {
        config.tracking.depart_threshold = depart;
    }
    if let Some(ret) = env_parse::<f64>(ENV_RETURN_THRESHOLD)? {
        config.tracking.return_threshold = ret;
    }
    config.push.enabled = env_bool(ENV_PUSH_ENABLED, config.push.enabled);
    config.tracking.notify_on_start = env_bool(ENV_NOTIFY_ON_START, config.tracking.notify_on_start);
    Ok(())
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
/// The file is not validated here; [`load`] validates after overrides.
///
/// # Errors
/// Returns `SpotSurferError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SpotSurferError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            SpotSurferError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| SpotSurferError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content; format follows the extension.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SpotSurferError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| SpotSurferError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(SpotSurferError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe the standard locations for a configuration file.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 4] = ["spotsurfer.json", "spotsurfer.toml", "config.json", "config.toml"];

    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| SpotSurferError::Config(format!("Invalid value for {}: {}", key, e)))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    env_opt(key)
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
