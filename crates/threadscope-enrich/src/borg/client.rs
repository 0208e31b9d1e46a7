use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::time::Duration;

use super::types::InfluenceResponse;
use crate::error::{EnrichError, Result};
use crate::traits::{EnrichmentSource, InfluenceLookup};

pub const DEFAULT_BASE_URL: &str = "https://api.borg.id";
pub const DEFAULT_PLATFORM: &str = "twitter";

/// HTTP client for the Borg influence API
///
/// The API token is sent as `Authorization: Token <key>` on every request.
#[derive(Debug, Clone)]
pub struct BorgClient {
    http_client: reqwest::Client,
    base_url: String,
    platform: String,
}

impl BorgClient {
    pub fn builder() -> BorgClientBuilder {
        BorgClientBuilder::default()
    }

    fn influencer_url(&self, account_id: &str) -> String {
        format!(
            "{}/influence/influencers/{}:{}/",
            self.base_url, self.platform, account_id
        )
    }
}

#[async_trait]
impl EnrichmentSource for BorgClient {
    async fn influence(&self, account_id: &str) -> Result<InfluenceLookup> {
        let response = self
            .http_client
            .get(self.influencer_url(account_id))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // Unindexed accounts come back as `{"error": ...}`, whatever the status
        match (status.is_success(), serde_json::from_str::<InfluenceResponse>(&body)) {
            (_, Ok(error @ InfluenceResponse::Error { .. })) => Ok(error.into()),
            (true, Ok(influence)) => Ok(influence.into()),
            (true, Err(e)) => Err(EnrichError::Malformed(e.to_string())),
            (false, _) => {
                tracing::error!(
                    "Enrichment request failed: status={}, body={}",
                    status,
                    body
                );
                Err(EnrichError::Api {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}

/// Builder for BorgClient
#[derive(Debug, Default)]
pub struct BorgClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    platform: Option<String>,
    timeout: Option<Duration>,
}

impl BorgClientBuilder {
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the API base URL (default: https://api.borg.id)
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Account namespace used in lookup keys (default: twitter)
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<BorgClient> {
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| EnrichError::Config("API key is required".to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Token {}", api_key))
                .map_err(|_| EnrichError::Config("Invalid API key format".to_string()))?,
        );

        let mut http = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(BorgClient {
            http_client: http.build()?,
            base_url,
            platform: self.platform.unwrap_or_else(|| DEFAULT_PLATFORM.to_string()),
        })
    }
}
