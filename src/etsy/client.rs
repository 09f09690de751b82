//! HTTP client for the Etsy Open API.

use std::time::Duration;

use async_trait::async_trait;
use http::header::ACCEPT;
use serde_json::Value;
use tracing::instrument;

use crate::config::{EtsyConfig, UPSTREAM_ERROR_EXCERPT_CHARS};

use super::messages::{EtsyError, UpstreamQuery};
use super::ListingSource;

/// Header carrying the application's API key
const API_KEY_HEADER: &str = "x-api-key";

/// Client for the active listings endpoint.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct EtsyClient {
    http: reqwest::Client,
    endpoint: String,
}

impl EtsyClient {
    pub fn new(config: &EtsyConfig) -> Result<Self, EtsyError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| EtsyError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ListingSource for EtsyClient {
    #[instrument(
        name = "etsy::active_listings",
        skip(self, api_key, query),
        fields(keywords = %query.keywords, limit = query.limit)
    )]
    async fn active_listings(
        &self,
        api_key: &str,
        query: &UpstreamQuery,
    ) -> Result<Value, EtsyError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(query)
            .header(API_KEY_HEADER, api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Etsy API returned an error status");
            return Err(EtsyError::Status {
                status,
                body: excerpt(&body),
            });
        }

        let bytes = response.bytes().await.map_err(transport_error)?;
        tracing::debug!(bytes = bytes.len(), "Received Etsy API response");

        serde_json::from_slice(&bytes).map_err(|e| EtsyError::Decode(e.to_string()))
    }
}

fn transport_error(err: reqwest::Error) -> EtsyError {
    if err.is_timeout() {
        EtsyError::Timeout
    } else {
        EtsyError::Transport(err.to_string())
    }
}

/// First characters of an upstream error body, cut on a char boundary
fn excerpt(body: &str) -> String {
    body.chars().take(UPSTREAM_ERROR_EXCERPT_CHARS).collect()
}
