pub mod borg;
pub mod cancel;
pub mod enricher;
pub mod error;
pub mod join;
pub mod traits;

pub use borg::{BorgClient, BorgClientBuilder};
pub use cancel::CancellationToken;
pub use enricher::{AccountEnricher, EnrichReport, EnrichStats};
pub use error::{EnrichError, Result};
pub use join::join_rows;
pub use traits::{EnrichmentSource, InfluenceLookup};

pub use threadscope_types::{Account, Cluster, ClusterScore, EnrichConfig, EnrichedRow};
