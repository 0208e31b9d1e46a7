// Twitter API v2 implementation of the post store

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

use crate::config::PostStoreConfig;
use crate::error::{PostStoreError, Result};
use crate::traits::{PostSet, PostStore, SearchPage};
use crate::twitter::types::TweetsResponse;

const TWEET_FIELDS: &str = "conversation_id,created_at,referenced_tweets,author_id";
const USER_FIELDS: &str = "name,username,description,created_at,public_metrics,verified";
const EXPANSIONS: &str = "author_id";

/// Lookup accepts at most this many ids per request
const LOOKUP_CHUNK: usize = 100;

/// Twitter v2 client (HTTP direct, no SDK)
#[derive(Debug)]
pub struct TwitterClient {
    http_client: reqwest::Client,
    base_url: String,
    page_size: u32,
}

impl TwitterClient {
    /// Create a client from configuration.
    ///
    /// Fails when the bearer token is empty or not a valid header value.
    pub fn new(config: PostStoreConfig) -> Result<Self> {
        if config.bearer_token.trim().is_empty() {
            return Err(PostStoreError::Config("bearer token is required".to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.bearer_token))
                .map_err(|_| PostStoreError::Config("invalid bearer token format".to_string()))?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url().to_string(),
            page_size: config.page_size,
        })
    }

    async fn get_tweets(&self, url: String, query: &[(&str, String)]) -> Result<TweetsResponse> {
        let response = self.http_client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Post store request failed: status={}, body={}", status, body);
            return Err(PostStoreError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TweetsResponse = response.json().await?;
        if !parsed.errors.is_empty() {
            tracing::debug!("Post store returned {} partial errors", parsed.errors.len());
        }
        Ok(parsed)
    }
}

#[async_trait]
impl PostStore for TwitterClient {
    async fn lookup_by_id(&self, ids: &[String]) -> Result<PostSet> {
        let mut set = PostSet::default();

        for chunk in ids.chunks(LOOKUP_CHUNK) {
            let query = [
                ("ids", chunk.join(",")),
                ("tweet.fields", TWEET_FIELDS.to_string()),
                ("user.fields", USER_FIELDS.to_string()),
                ("expansions", EXPANSIONS.to_string()),
            ];
            let response = self
                .get_tweets(format!("{}/tweets", self.base_url), &query)
                .await?;
            set.extend(response.into_post_set());
        }

        Ok(set)
    }

    async fn search_page(
        &self,
        conversation_id: &str,
        next_token: Option<&str>,
    ) -> Result<SearchPage> {
        let mut query = vec![
            ("query", format!("conversation_id:{}", conversation_id)),
            ("max_results", self.page_size.to_string()),
            ("tweet.fields", TWEET_FIELDS.to_string()),
            ("user.fields", USER_FIELDS.to_string()),
            ("expansions", EXPANSIONS.to_string()),
        ];
        if let Some(token) = next_token {
            query.push(("next_token", token.to_string()));
        }

        let response = self
            .get_tweets(format!("{}/tweets/search/recent", self.base_url), &query)
            .await?;
        let next_token = response.next_token();

        Ok(SearchPage {
            set: response.into_post_set(),
            next_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = TwitterClient::new(PostStoreConfig::new("token"));
        assert!(client.is_ok());
    }

    #[test]
    fn test_empty_token_rejected() {
        let err = TwitterClient::new(PostStoreConfig::new("  ")).unwrap_err();
        assert!(err.to_string().contains("bearer token"));
    }
}
