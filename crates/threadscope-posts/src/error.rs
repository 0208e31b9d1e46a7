use thiserror::Error;

#[derive(Error, Debug)]
pub enum PostStoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Post store API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Invalid post reference: {0}")]
    InvalidReference(String),

    #[error("Post not found: {0}")]
    PostNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PostStoreError>;
