use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// How the thread assembler descends into replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssembleMode {
    /// Every direct reply becomes a sibling and every subtree is walked
    #[default]
    FullTree,
    /// Every direct reply to the root is kept, but below that only the first
    /// reply at each level is followed
    MainThreadOnly,
}

impl fmt::Display for AssembleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssembleMode::FullTree => write!(f, "full_tree"),
            AssembleMode::MainThreadOnly => write!(f, "main_thread_only"),
        }
    }
}

impl FromStr for AssembleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "full_tree" | "full" => Ok(AssembleMode::FullTree),
            "main_thread_only" | "main_thread" | "main" => Ok(AssembleMode::MainThreadOnly),
            other => Err(format!("unknown assemble mode: {}", other)),
        }
    }
}

/// Scheduling knobs for the account enricher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichConfig {
    pub concurrency: usize,
    pub request_timeout: Duration,
    pub batch_timeout: Option<Duration>,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            concurrency: 16,
            request_timeout: Duration::from_secs(10),
            batch_timeout: Some(Duration::from_secs(120)),
        }
    }
}

impl EnrichConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concurrency below 1 is clamped to 1
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_batch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.batch_timeout = timeout;
        self
    }
}
