//! `POST /subscribe` registrar
//!
//! One attempt per call. A failure goes back to the caller; nothing is queued
//! for a later retry.

use async_trait::async_trait;
use spotsurfer_core::SubscriptionRegistrar;
use spotsurfer_domain::constants::SUBSCRIBE_PATH;
use spotsurfer_domain::{PushSubscription, Result, ServerConfig};
use tracing::{debug, instrument};
use url::Url;

use super::endpoint;
use crate::http::{RetryPolicy, ServerClient};

pub struct HttpSubscriptionRegistrar {
    client: ServerClient,
    url: Url,
}

impl HttpSubscriptionRegistrar {
    /// # Errors
    /// Returns `Config` for an invalid base URL, or the client build error.
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let client = ServerClient::new(config.request_timeout(), RetryPolicy::SINGLE)?;
        Ok(Self { client, url: endpoint(&config.base_url, SUBSCRIBE_PATH)? })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl SubscriptionRegistrar for HttpSubscriptionRegistrar {
    #[instrument(skip_all, fields(endpoint = %subscription.endpoint))]
    async fn register(&self, subscription: &PushSubscription) -> Result<()> {
        self.client.post_json(&self.url, subscription).await?;
        debug!(url = %self.url, "subscription stored on server");
        Ok(())
    }
}
