use std::collections::HashMap;
use threadscope_types::{Account, Conversation};

use crate::error::{PostStoreError, Result};
use crate::reference::parse_post_reference;
use crate::traits::PostStore;

/// Fetch every reachable post of the conversation `reference` belongs to.
///
/// `reference` may be a post id or a status URL. The referenced post must
/// exist; the conversation root is looked up separately and may be missing.
pub async fn fetch_conversation<S>(store: &S, reference: &str) -> Result<Conversation>
where
    S: PostStore + ?Sized,
{
    let requested_id = parse_post_reference(reference)?;

    let mut set = store.lookup_by_id(&[requested_id.clone()]).await?;
    let conversation_id = set
        .posts
        .iter()
        .find(|p| p.id == requested_id)
        .map(|p| p.conversation_id.clone())
        .ok_or_else(|| PostStoreError::PostNotFound(requested_id.clone()))?;

    if conversation_id != requested_id {
        let root = store.lookup_by_id(&[conversation_id.clone()]).await?;
        if root.is_empty() {
            tracing::warn!(%conversation_id, "Conversation root could not be looked up");
        }
        set.extend(root);
    }

    let searched = store.search_conversation(&conversation_id).await?;
    tracing::info!(
        %conversation_id,
        searched = searched.posts.len(),
        "Fetched conversation"
    );
    set.extend(searched);

    let conversation = Conversation::new(conversation_id, requested_id, set.posts, Vec::new());
    let accounts = merge_accounts(&conversation, set.accounts);

    Ok(Conversation {
        accounts,
        ..conversation
    })
}

/// Authors of the conversation in first-post order, with profile data when
/// the store supplied it.
fn merge_accounts(conversation: &Conversation, profiled: Vec<Account>) -> Vec<Account> {
    let mut by_id: HashMap<String, Account> =
        profiled.into_iter().map(|a| (a.id.clone(), a)).collect();

    Account::from_posts(&conversation.posts)
        .into_iter()
        .map(|bare| by_id.remove(&bare.id).unwrap_or(bare))
        .collect()
}
