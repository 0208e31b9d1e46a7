use config::{Config as ConfigLoader, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use threadscope::{AssembleMode, BorgClient, BorgClientBuilder, EnrichConfig, PostStoreConfig};

pub const TWITTER_TOKEN: &str = "TWITTER_TOKEN";
pub const BORG_API_KEY: &str = "BORG_API_KEY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingSecrets(Vec<String>),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub posts: PostsConfig,
    #[serde(default)]
    pub enrich: EnrichSettings,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(skip)]
    pub twitter_token: String,
    #[serde(skip)]
    pub borg_api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PostsConfig {
    pub base_url: Option<String>,
    pub page_size: u32,
    pub timeout_ms: u64,
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            page_size: 100,
            timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnrichSettings {
    pub base_url: Option<String>,
    pub platform: Option<String>,
    pub concurrency: usize,
    pub request_timeout_ms: u64,
    /// Whole-batch deadline; 0 disables it
    pub batch_timeout_ms: u64,
}

impl Default for EnrichSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            platform: None,
            concurrency: 16,
            request_timeout_ms: 10_000,
            batch_timeout_ms: 120_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub mode: AssembleMode,
    /// Number of communities shown in the distribution chart
    pub top: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            mode: AssembleMode::FullTree,
            top: 25,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables such as `THREADSCOPE_ENRICH__CONCURRENCY`
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("THREADSCOPE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut cfg: Config = builder.build()?.try_deserialize()?;
        cfg.load_secrets(|key| std::env::var(key).ok())?;

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            .add_source(File::from(path.as_ref()))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Fill in the secrets, reporting every missing one at once
    pub fn load_secrets<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let twitter_token = read(TWITTER_TOKEN);
        let borg_api_key = read(BORG_API_KEY);

        let mut missing = Vec::new();
        if twitter_token.is_none() {
            missing.push(TWITTER_TOKEN.to_string());
        }
        if borg_api_key.is_none() {
            missing.push(BORG_API_KEY.to_string());
        }
        if !missing.is_empty() {
            return Err(ConfigError::MissingSecrets(missing));
        }

        self.twitter_token = twitter_token.unwrap_or_default();
        self.borg_api_key = borg_api_key.unwrap_or_default();
        Ok(())
    }

    pub fn post_store_config(&self) -> PostStoreConfig {
        let mut config = PostStoreConfig::new(self.twitter_token.clone())
            .with_page_size(self.posts.page_size)
            .with_request_timeout(Duration::from_millis(self.posts.timeout_ms));
        if let Some(base_url) = &self.posts.base_url {
            config = config.with_base_url(base_url.clone());
        }
        config
    }

    pub fn borg_builder(&self) -> BorgClientBuilder {
        let mut builder = BorgClient::builder()
            .api_key(self.borg_api_key.clone())
            .timeout(Duration::from_millis(self.enrich.request_timeout_ms));
        if let Some(base_url) = &self.enrich.base_url {
            builder = builder.base_url(base_url.clone());
        }
        if let Some(platform) = &self.enrich.platform {
            builder = builder.platform(platform.clone());
        }
        builder
    }

    pub fn enrich_config(&self) -> EnrichConfig {
        let batch_timeout = match self.enrich.batch_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };
        EnrichConfig::new()
            .with_concurrency(self.enrich.concurrency)
            .with_request_timeout(Duration::from_millis(self.enrich.request_timeout_ms))
            .with_batch_timeout(batch_timeout)
    }
}
