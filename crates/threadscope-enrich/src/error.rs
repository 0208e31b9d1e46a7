use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Enrichment API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Malformed enrichment response: {0}")]
    Malformed(String),

    #[error("Lookup timed out after {0} ms")]
    Timeout(u64),

    #[error("Lookup cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EnrichError>;
