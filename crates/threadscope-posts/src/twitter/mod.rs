mod client;
mod types;

pub use client::TwitterClient;
pub use types::{Includes, ReferencedTweet, ResponseMeta, TweetData, TweetsResponse, UserData};
