use async_trait::async_trait;
use threadscope_types::{Cluster, ClusterScore};

use crate::error::Result;

/// What the enrichment source knows about one account
#[derive(Debug, Clone, PartialEq)]
pub enum InfluenceLookup {
    /// The source has no data for the account
    Unindexed { reason: String },
    Indexed {
        clusters: Vec<Cluster>,
        latest_scores: Vec<ClusterScore>,
    },
}

/// Per-account influence lookups.
///
/// An `Err` means the query itself broke. "No data" is `Ok(Unindexed)`.
#[async_trait]
pub trait EnrichmentSource: Send + Sync {
    async fn influence(&self, account_id: &str) -> Result<InfluenceLookup>;
}
