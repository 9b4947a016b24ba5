//! Remote SpotSurfer server clients
//!
//! Two collaborators, both best-effort from the tracker's point of view:
//! - `POST /subscribe` stores this installation's push subscription
//! - `POST /ask` is the assistant, told when a trip starts

pub mod assistant;
pub mod registrar;

use spotsurfer_domain::{Result, SpotSurferError};
use url::Url;

pub use assistant::{AskRequest, AskResponse, AssistantClient};
pub use registrar::HttpSubscriptionRegistrar;

/// Resolve `path` against the configured server base URL.
pub(crate) fn endpoint(base_url: &str, path: &str) -> Result<Url> {
    let mut base = Url::parse(base_url)
        .map_err(|e| SpotSurferError::Config(format!("invalid server URL '{base_url}': {e}")))?;
    // Keep any path prefix on the base ("http://host/api" + "/ask").
    if !base.path().ends_with('/') {
        let prefixed = format!("{}/", base.path());
        base.set_path(&prefixed);
    }
    base.join(path.trim_start_matches('/'))
        .map_err(|e| SpotSurferError::Config(format!("invalid endpoint path '{path}': {e}")))
}
