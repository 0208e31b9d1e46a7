pub mod account;
pub mod config;
pub mod enrichment;
pub mod post;
pub mod thread;

pub use account::Account;
pub use config::{AssembleMode, EnrichConfig};
pub use enrichment::{Cluster, ClusterScore, EnrichedRow};
pub use post::{Conversation, Post};
pub use thread::{AssembledThread, NodeRef, ThreadNode};
