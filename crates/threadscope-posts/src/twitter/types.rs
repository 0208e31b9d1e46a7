// Wire types for the v2 tweet endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use threadscope_types::{Account, Post};

use crate::error::{PostStoreError, Result};
use crate::traits::PostSet;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TweetsResponse {
    #[serde(default)]
    pub data: Vec<TweetData>,
    #[serde(default)]
    pub includes: Includes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
    /// Partial errors, e.g. ids that were deleted or are not visible
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TweetData {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub referenced_tweets: Vec<ReferencedTweet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferencedTweet {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Includes {
    #[serde(default)]
    pub users: Vec<UserData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserData {
    pub id: String,
    pub username: String,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(default)]
    pub result_count: u32,
}

impl TweetData {
    pub fn replied_to_id(&self) -> Option<&str> {
        self.referenced_tweets
            .iter()
            .find(|r| r.kind == "replied_to")
            .map(|r| r.id.as_str())
    }

    fn into_post(self, usernames: &HashMap<&str, &str>) -> Result<Post> {
        let replied_to_id = self.replied_to_id().map(|s| s.to_string());
        let author_id = self
            .author_id
            .ok_or_else(|| PostStoreError::Malformed(format!("post {} has no author_id", self.id)))?;
        let created_at = self
            .created_at
            .ok_or_else(|| PostStoreError::Malformed(format!("post {} has no created_at", self.id)))?;
        // Posts without a conversation id start their own conversation
        let conversation_id = self.conversation_id.unwrap_or_else(|| self.id.clone());
        let author_username = usernames
            .get(author_id.as_str())
            .map(|u| u.to_string())
            .unwrap_or_else(|| author_id.clone());

        Ok(Post {
            id: self.id,
            conversation_id,
            author_id,
            author_username,
            text: self.text,
            created_at,
            replied_to_id,
        })
    }
}

impl TweetsResponse {
    pub fn next_token(&self) -> Option<String> {
        self.meta.as_ref().and_then(|m| m.next_token.clone())
    }

    /// Convert to the provider-agnostic post set.
    ///
    /// Posts missing required fields are skipped with a warning rather than
    /// failing the whole page.
    pub fn into_post_set(self) -> PostSet {
        let usernames: HashMap<&str, &str> = self
            .includes
            .users
            .iter()
            .map(|u| (u.id.as_str(), u.username.as_str()))
            .collect();

        let mut posts = Vec::with_capacity(self.data.len());
        for tweet in self.data {
            match tweet.into_post(&usernames) {
                Ok(post) => posts.push(post),
                Err(e) => tracing::warn!("Skipping post: {}", e),
            }
        }

        let accounts = self
            .includes
            .users
            .iter()
            .map(|u| Account {
                id: u.id.clone(),
                username: u.username.clone(),
                profile: u.profile.clone(),
            })
            .collect();

        PostSet::new(posts, accounts)
    }
}
