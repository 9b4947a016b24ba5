//! JSON client for the SpotSurfer server endpoints.
//!
//! Each caller picks a [`RetryPolicy`]. Registration tries once so a failure
//! reaches the user straight away, while the trip-start question gets one
//! retry after a short pause.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::Serialize;
use spotsurfer_domain::{Result, SpotSurferError};
use tracing::debug;
use url::Url;

use crate::errors::InfraError;

/// Attempt budget for one logical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    backoff: Duration,
}

impl RetryPolicy {
    /// One attempt; the caller reports the failure.
    pub const SINGLE: Self = Self { attempts: 1, backoff: Duration::ZERO };

    /// A second attempt after `backoff` when the first hit a connect failure,
    /// a timeout, or a 5xx status.
    pub const fn retry_once(backoff: Duration) -> Self {
        Self { attempts: 2, backoff }
    }

    /// Total attempts, the first included.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

/// POSTs JSON bodies with a per-request timeout and a fixed retry policy.
#[derive(Clone)]
pub struct ServerClient {
    client: Client,
    policy: RetryPolicy,
}

impl ServerClient {
    /// # Errors
    /// Returns `Internal` if the underlying client cannot be built.
    pub fn new(timeout: Duration, policy: RetryPolicy) -> Result<Self> {
        let client = Client::builder().timeout(timeout).no_proxy().build().map_err(to_domain)?;
        Ok(Self { client, policy })
    }

    /// Retry policy every request from this client follows.
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// POST `body` as JSON and fail on any non-success status.
    pub async fn post_json<B>(&self, url: &Url, body: &B) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let mut attempt = 1;
        loop {
            debug!(attempt, %url, "sending POST");
            let result = self.client.post(url.clone()).json(body).send().await;

            let transient = match &result {
                Ok(response) => response.status().is_server_error(),
                Err(err) => err.is_connect() || err.is_timeout(),
            };
            if transient && attempt < self.policy.attempts {
                debug!(attempt, %url, "transient failure, retrying");
                tokio::time::sleep(self.policy.backoff).await;
                attempt += 1;
                continue;
            }

            return result.and_then(Response::error_for_status).map_err(to_domain);
        }
    }
}

fn to_domain(err: reqwest::Error) -> SpotSurferError {
    InfraError::from(err).into()
}
