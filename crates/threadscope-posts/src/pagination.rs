use async_stream::try_stream;
use futures::Stream;
use std::collections::HashSet;
use std::pin::Pin;

use crate::error::Result;
use crate::traits::{PostSet, PostStore};

/// Stream every page of a conversation search.
///
/// Follows `next_token` until the store stops returning one. A token that
/// comes back a second time ends the stream instead of looping forever.
pub fn search_pages<'a, S>(
    store: &'a S,
    conversation_id: &'a str,
) -> Pin<Box<dyn Stream<Item = Result<PostSet>> + Send + 'a>>
where
    S: PostStore + ?Sized,
{
    Box::pin(try_stream! {
        let mut next_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();
        let mut page_number = 0usize;

        loop {
            let page = store
                .search_page(conversation_id, next_token.as_deref())
                .await?;
            page_number += 1;
            tracing::debug!(
                conversation_id,
                page = page_number,
                posts = page.set.posts.len(),
                "Fetched search page"
            );

            let token = page.next_token.clone();
            yield page.set;

            match token {
                Some(token) if seen_tokens.insert(token.clone()) => next_token = Some(token),
                Some(token) => {
                    tracing::warn!(conversation_id, %token, "Pagination token repeated, stopping");
                    break;
                }
                None => break,
            }
        }
    })
}
