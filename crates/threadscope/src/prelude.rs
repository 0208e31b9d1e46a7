//! Prelude module for convenient imports
//!
//! ```rust
//! use threadscope::prelude::*;
//! ```

pub use crate::{
    render_tree, Account, AccountEnricher, AssembleMode, AssembledThread, BorgClient,
    CancellationToken, Conversation, EnrichConfig, EnrichedRow, EnrichmentSource, Exploration,
    InfluenceLookup, NodeRef, Post, PostStore, PostStoreConfig, ThreadAssembler, ThreadExplorer,
    ThreadNode, ThreadSummary, TwitterClient,
};
