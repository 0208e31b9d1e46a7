use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.twitter.com/2";

/// Search endpoints accept between 10 and 100 results per page
pub const MAX_PAGE_SIZE: u32 = 100;
const MIN_PAGE_SIZE: u32 = 10;

/// Connection settings for the post store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostStoreConfig {
    pub bearer_token: String,
    /// Base URL for the API (optional, defaults to https://api.twitter.com/2)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub page_size: u32,
    pub request_timeout: Duration,
}

impl PostStoreConfig {
    pub fn new(bearer_token: impl Into<String>) -> Self {
        Self {
            bearer_token: bearer_token.into(),
            base_url: None,
            page_size: MAX_PAGE_SIZE,
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PostStoreConfig::new("token");
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.page_size, 100);
    }

    #[test]
    fn test_page_size_clamped() {
        assert_eq!(PostStoreConfig::new("t").with_page_size(500).page_size, 100);
        assert_eq!(PostStoreConfig::new("t").with_page_size(1).page_size, 10);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = PostStoreConfig::new("t").with_base_url("http://localhost:1234/");
        assert_eq!(config.base_url(), "http://localhost:1234");
    }
}
