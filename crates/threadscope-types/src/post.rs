use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::account::Account;

/// A single post as returned by the post store, flattened to the fields the
/// explorer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub conversation_id: String,
    pub author_id: String,
    pub author_username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replied_to_id: Option<String>,
}

impl Post {
    pub fn new(
        id: impl Into<String>,
        conversation_id: impl Into<String>,
        author_id: impl Into<String>,
        author_username: impl Into<String>,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            conversation_id: conversation_id.into(),
            author_id: author_id.into(),
            author_username: author_username.into(),
            text: text.into(),
            created_at,
            replied_to_id: None,
        }
    }

    pub fn replying_to(mut self, parent_id: impl Into<String>) -> Self {
        self.replied_to_id = Some(parent_id.into());
        self
    }

    /// True when this post opens its conversation
    pub fn is_conversation_root(&self) -> bool {
        self.id == self.conversation_id
    }

    /// One-line label used by the tree view: `username, id: text`
    pub fn label(&self) -> String {
        format!("{}, {}: {}", self.author_username, self.id, self.text)
    }
}

/// Every post fetched for one conversation, plus the accounts that wrote them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub conversation_id: String,
    /// Id of the post the exploration started from
    pub requested_id: String,
    pub posts: Vec<Post>,
    pub accounts: Vec<Account>,
}

impl Conversation {
    pub fn new(
        conversation_id: impl Into<String>,
        requested_id: impl Into<String>,
        posts: Vec<Post>,
        accounts: Vec<Account>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            requested_id: requested_id.into(),
            posts: dedup_posts(posts),
            accounts,
        }
    }

    pub fn root(&self) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == self.conversation_id)
    }

    pub fn unique_authors(&self) -> usize {
        self.posts
            .iter()
            .map(|p| p.author_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

/// Drop repeated post ids, keeping the first occurrence and the input order.
pub fn dedup_posts(posts: Vec<Post>) -> Vec<Post> {
    let mut seen = HashSet::new();
    posts
        .into_iter()
        .filter(|p| seen.insert(p.id.clone()))
        .collect()
}
