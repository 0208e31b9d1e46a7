//! High-level facade that runs a full exploration

use anyhow::{bail, Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use threadscope_enrich::{
    AccountEnricher, BorgClient, BorgClientBuilder, CancellationToken, EnrichStats,
    EnrichmentSource,
};
use threadscope_posts::{fetch_conversation, PostStore, PostStoreConfig, TwitterClient};
use threadscope_thread::ThreadAssembler;
use threadscope_types::{AssembleMode, AssembledThread, Conversation, EnrichConfig, EnrichedRow};

use crate::summary::ThreadSummary;

/// Everything produced for one thread
#[derive(Debug, Clone, Serialize)]
pub struct Exploration {
    pub conversation: Conversation,
    pub thread: AssembledThread,
    pub rows: Vec<EnrichedRow>,
    pub enrich_stats: EnrichStats,
    pub summary: ThreadSummary,
}

impl Exploration {
    /// JSON document with the reply tree as its flat node list and each
    /// enriched row flattened into prefixed columns
    pub fn to_json(&self) -> Value {
        let rows: Vec<Value> = self
            .rows
            .iter()
            .map(|row| Value::Object(row.to_record()))
            .collect();

        json!({
            "conversation_id": self.conversation.conversation_id,
            "requested_id": self.conversation.requested_id,
            "root_fallback": self.thread.root_fallback,
            "detached": self.thread.detached,
            "tree": self.thread.nodes(),
            "rows": rows,
            "enrichment": self.enrich_stats,
            "summary": self.summary,
        })
    }
}

/// Fetches a conversation, rebuilds its reply tree and enriches its authors.
///
/// # Example
///
/// ```rust,no_run
/// use threadscope::prelude::*;
///
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// let explorer = ThreadExplorer::builder()
///     .twitter(PostStoreConfig::new("bearer-token"))?
///     .borg(BorgClient::builder().api_key("borg-key"))?
///     .mode(AssembleMode::MainThreadOnly)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ThreadExplorer {
    post_store: Arc<dyn PostStore>,
    enricher: AccountEnricher,
    assembler: ThreadAssembler,
}

impl ThreadExplorer {
    pub fn builder() -> ExplorerBuilder {
        ExplorerBuilder::new()
    }

    pub async fn explore(&self, reference: &str) -> Result<Exploration> {
        self.explore_with_cancel(reference, &CancellationToken::new())
            .await
    }

    /// Run an exploration. Cancelling `cancel` while the conversation is
    /// being fetched aborts with an error. Once enrichment has started it is
    /// cut short instead, and the accounts not yet looked up are reported
    /// without cluster data.
    pub async fn explore_with_cancel(
        &self,
        reference: &str,
        cancel: &CancellationToken,
    ) -> Result<Exploration> {
        let conversation = tokio::select! {
            biased;
            _ = cancel.cancelled() => bail!("Cancelled while fetching conversation for {}", reference),
            fetched = fetch_conversation(self.post_store.as_ref(), reference) => fetched
                .with_context(|| format!("Failed to fetch conversation for {}", reference))?,
        };

        tracing::info!(
            conversation_id = %conversation.conversation_id,
            posts = conversation.posts.len(),
            accounts = conversation.accounts.len(),
            "Conversation loaded"
        );

        let thread = self
            .assembler
            .assemble(&conversation.posts, &conversation.conversation_id)?;

        let report = self
            .enricher
            .enrich_with_cancel(conversation.accounts.clone(), cancel)
            .await;

        let summary = ThreadSummary::build(&conversation.posts, &report.rows);

        Ok(Exploration {
            conversation,
            thread,
            rows: report.rows,
            enrich_stats: report.stats,
            summary,
        })
    }
}

/// Builder for ThreadExplorer
#[derive(Default)]
pub struct ExplorerBuilder {
    post_store: Option<Arc<dyn PostStore>>,
    enrichment_source: Option<Arc<dyn EnrichmentSource>>,
    enrich_config: EnrichConfig,
    mode: AssembleMode,
}

impl ExplorerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post_store(mut self, store: Arc<dyn PostStore>) -> Self {
        self.post_store = Some(store);
        self
    }

    /// Use the Twitter v2 API as the post store
    pub fn twitter(self, config: PostStoreConfig) -> Result<Self> {
        let client = TwitterClient::new(config).context("Failed to create post store client")?;
        Ok(self.post_store(Arc::new(client)))
    }

    pub fn enrichment_source(mut self, source: Arc<dyn EnrichmentSource>) -> Self {
        self.enrichment_source = Some(source);
        self
    }

    /// Use the Borg influence API as the enrichment source
    pub fn borg(self, builder: BorgClientBuilder) -> Result<Self> {
        let client: BorgClient = builder
            .build()
            .context("Failed to create enrichment client")?;
        Ok(self.enrichment_source(Arc::new(client)))
    }

    /// Set enrichment scheduling (default: 16 concurrent lookups)
    pub fn enrich_config(mut self, config: EnrichConfig) -> Self {
        self.enrich_config = config;
        self
    }

    /// Set the reply walk mode (default: full tree)
    pub fn mode(mut self, mode: AssembleMode) -> Self {
        self.mode = mode;
        self
    }

    /// Build the explorer
    ///
    /// # Errors
    ///
    /// Returns an error naming every missing collaborator.
    pub fn build(self) -> Result<ThreadExplorer> {
        let mut missing = Vec::new();
        if self.post_store.is_none() {
            missing.push("post store");
        }
        if self.enrichment_source.is_none() {
            missing.push("enrichment source");
        }

        match (self.post_store, self.enrichment_source) {
            (Some(post_store), Some(source)) => Ok(ThreadExplorer {
                post_store,
                enricher: AccountEnricher::new(source, self.enrich_config),
                assembler: ThreadAssembler::new(self.mode),
            }),
            _ => bail!("Explorer is missing: {}", missing.join(", ")),
        }
    }
}
