use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::post::Post;

/// An account that posted in the thread.
///
/// `profile` carries whatever extra user fields the post store returned
/// (display name, follower counts, ...). They are opaque to the explorer and
/// only travel through to the enriched rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub username: String,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl Account {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            profile: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.profile.insert(key.into(), value.into());
        self
    }

    /// Distinct authors of `posts`, in first-seen order
    pub fn from_posts(posts: &[Post]) -> Vec<Account> {
        let mut seen = HashSet::new();
        posts
            .iter()
            .filter(|p| seen.insert(p.author_id.clone()))
            .map(|p| Account::new(p.author_id.clone(), p.author_username.clone()))
            .collect()
    }

    /// Account fields as `author.*` columns
    pub fn to_columns(&self) -> Map<String, Value> {
        let mut columns = Map::new();
        columns.insert("author.id".to_string(), Value::String(self.id.clone()));
        columns.insert(
            "author.username".to_string(),
            Value::String(self.username.clone()),
        );
        for (key, value) in &self.profile {
            columns.insert(format!("author.{}", key), value.clone());
        }
        columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_from_posts_is_distinct_and_ordered() {
        let at = Utc.timestamp_opt(0, 0).unwrap();
        let posts = vec![
            Post::new("1", "1", "u2", "bob", "a", at),
            Post::new("2", "1", "u1", "alice", "b", at),
            Post::new("3", "1", "u2", "bob", "c", at),
        ];

        let accounts = Account::from_posts(&posts);
        let ids: Vec<_> = accounts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["u2", "u1"]);
    }

    #[test]
    fn test_profile_flattens_on_serialize() {
        let account = Account::new("7", "carol").with_field("name", "Carol");
        let json = serde_json::to_value(&account).unwrap();

        assert_eq!(json["id"], "7");
        assert_eq!(json["name"], "Carol");
    }

    #[test]
    fn test_columns_are_prefixed() {
        let account = Account::new("7", "carol").with_field("verified", true);
        let columns = account.to_columns();

        assert_eq!(columns["author.id"], "7");
        assert_eq!(columns["author.username"], "carol");
        assert_eq!(columns["author.verified"], true);
    }
}
