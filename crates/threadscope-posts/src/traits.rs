use async_trait::async_trait;
use futures::StreamExt;
use std::collections::HashSet;
use threadscope_types::{Account, Post};

use crate::error::Result;
use crate::pagination::search_pages;

/// Posts returned by one or more store calls, with the accounts that wrote them.
#[derive(Debug, Clone, Default)]
pub struct PostSet {
    pub posts: Vec<Post>,
    /// Author profiles from the response's user expansion
    pub accounts: Vec<Account>,
}

impl PostSet {
    pub fn new(posts: Vec<Post>, accounts: Vec<Account>) -> Self {
        Self { posts, accounts }
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Append another set. Accounts already present are kept as they are.
    pub fn extend(&mut self, other: PostSet) {
        self.posts.extend(other.posts);
        let known: HashSet<String> = self.accounts.iter().map(|a| a.id.clone()).collect();
        self.accounts
            .extend(other.accounts.into_iter().filter(|a| !known.contains(&a.id)));
    }
}

/// One page of a conversation search
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub set: PostSet,
    pub next_token: Option<String>,
}

/// Read access to a remote post store.
///
/// Implementations only fetch; stitching posts into a thread is the
/// assembler's job.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Fetch posts by id. Ids the store cannot return are silently absent.
    async fn lookup_by_id(&self, ids: &[String]) -> Result<PostSet>;

    /// Fetch one page of posts belonging to `conversation_id`
    async fn search_page(
        &self,
        conversation_id: &str,
        next_token: Option<&str>,
    ) -> Result<SearchPage>;

    /// Fetch every page of `conversation_id` and concatenate them
    async fn search_conversation(&self, conversation_id: &str) -> Result<PostSet> {
        let mut pages = search_pages(self, conversation_id);
        let mut all = PostSet::default();
        while let Some(page) = pages.next().await {
            all.extend(page?);
        }
        Ok(all)
    }
}
