//! `POST /ask` assistant client

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use spotsurfer_core::TripAnnouncer;
use spotsurfer_domain::constants::ASK_PATH;
use spotsurfer_domain::{Coordinate, Result, ServerConfig, SpotSurferError};
use tracing::{debug, info, instrument};
use url::Url;

use super::endpoint;
use crate::http::{RetryPolicy, ServerClient};

/// Intent sent with the automatic trip-start question.
pub const TRIP_START_INTENT: &str = "trip-start";

/// Pause before the single retry of a failed question.
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

const TRIP_START_MESSAGE: &str =
    "I just started a trip. What should I know about parking near my location?";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
}

impl AskRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), lat: None, lng: None, lang: None, intent: None }
    }

    pub fn at(mut self, position: Coordinate) -> Self {
        self.lat = Some(position.latitude);
        self.lng = Some(position.longitude);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AskResponse {
    pub response: String,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

pub struct AssistantClient {
    client: ServerClient,
    url: Url,
    language: Option<String>,
}

impl AssistantClient {
    /// # Errors
    /// Returns `Config` for an invalid base URL, or the client build error.
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let client =
            ServerClient::new(config.request_timeout(), RetryPolicy::retry_once(RETRY_BACKOFF))?;
        Ok(Self {
            client,
            url: endpoint(&config.base_url, ASK_PATH)?,
            language: config.language.clone(),
        })
    }

    /// Ask the assistant a question.
    #[instrument(skip_all, fields(intent = request.intent.as_deref().unwrap_or("chat")))]
    pub async fn ask(&self, request: &AskRequest) -> Result<AskResponse> {
        let response = self.client.post_json(&self.url, request).await?;
        response.json::<AskResponse>().await.map_err(|e| {
            SpotSurferError::InvalidInput(format!("unexpected /ask response: {e}"))
        })
    }
}

#[async_trait]
impl TripAnnouncer for AssistantClient {
    async fn trip_started(&self, start: Coordinate) -> Result<()> {
        let request = AskRequest {
            lang: self.language.clone(),
            intent: Some(TRIP_START_INTENT.to_string()),
            ..AskRequest::new(TRIP_START_MESSAGE).at(start)
        };
        let answer = self.ask(&request).await?;
        info!(chars = answer.response.len(), "assistant answered trip start");
        debug!(response = %answer.response, "assistant response");
        Ok(())
    }
}
