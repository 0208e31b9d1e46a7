mod client;
mod types;

pub use client::{BorgClient, BorgClientBuilder, DEFAULT_BASE_URL, DEFAULT_PLATFORM};
pub use types::InfluenceResponse;
