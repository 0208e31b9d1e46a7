pub mod config;
pub mod conversation;
pub mod error;
pub mod pagination;
pub mod reference;
pub mod traits;
pub mod twitter;

pub use config::PostStoreConfig;
pub use conversation::fetch_conversation;
pub use error::{PostStoreError, Result};
pub use pagination::search_pages;
pub use reference::parse_post_reference;
pub use traits::{PostSet, PostStore, SearchPage};
pub use twitter::TwitterClient;
