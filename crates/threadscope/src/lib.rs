//! # Threadscope
//!
//! Explore a social-media reply thread: rebuild its reply tree from a flat
//! set of posts and enrich every participating account with influence-cluster
//! membership from an external source.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use threadscope::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let explorer = ThreadExplorer::builder()
//!         .twitter(PostStoreConfig::new(std::env::var("TWITTER_TOKEN")?))?
//!         .borg(BorgClient::builder().api_key(std::env::var("BORG_API_KEY")?))?
//!         .build()?;
//!
//!     let exploration = explorer.explore("1603765939723534337").await?;
//!     println!("{}", render_tree(&exploration.thread));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`threadscope-types`**: posts, accounts, clusters, enriched rows, tree nodes
//! - **`threadscope-posts`**: post store trait and the Twitter v2 client
//! - **`threadscope-thread`**: reply-tree assembler and text rendering
//! - **`threadscope-enrich`**: enrichment source trait, Borg client, bounded enricher

pub mod explorer;
pub mod prelude;
pub mod summary;

pub use explorer::{Exploration, ExplorerBuilder, ThreadExplorer};
pub use summary::{AccountActivity, CommunityCount, ThreadSummary};

pub use threadscope_types::{
    Account, AssembleMode, AssembledThread, Cluster, ClusterScore, Conversation, EnrichConfig,
    EnrichedRow, NodeRef, Post, ThreadNode,
};

pub use threadscope_posts::{
    fetch_conversation, parse_post_reference, PostSet, PostStore, PostStoreConfig,
    PostStoreError, SearchPage, TwitterClient,
};

pub use threadscope_thread::{render_tree, AssembleError, ThreadAssembler};

pub use threadscope_enrich::{
    AccountEnricher, BorgClient, BorgClientBuilder, CancellationToken, EnrichError, EnrichReport,
    EnrichStats, EnrichmentSource, InfluenceLookup,
};
