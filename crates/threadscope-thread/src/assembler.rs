use std::collections::{HashMap, HashSet};
use thiserror::Error;
use threadscope_types::{AssembleMode, AssembledThread, Post};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AssembleError {
    #[error("Conversation {0} has no posts")]
    EmptyConversation(String),
}

/// Rebuilds the reply tree of one conversation from a flat list of posts.
///
/// The list may be incomplete. A missing root is replaced by the earliest
/// post, and replies whose parent is absent are left out of the tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadAssembler {
    mode: AssembleMode,
}

impl ThreadAssembler {
    pub fn new(mode: AssembleMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> AssembleMode {
        self.mode
    }

    pub fn assemble(
        &self,
        posts: &[Post],
        conversation_id: &str,
    ) -> Result<AssembledThread, AssembleError> {
        let (root, root_fallback) = match posts.iter().find(|p| p.id == conversation_id) {
            Some(root) => (root, false),
            None => {
                let earliest = posts
                    .iter()
                    .min_by_key(|p| p.created_at)
                    .ok_or_else(|| AssembleError::EmptyConversation(conversation_id.to_string()))?;
                tracing::warn!(
                    conversation_id,
                    substitute = %earliest.id,
                    "Conversation root missing, using oldest post as root"
                );
                (earliest, true)
            }
        };

        let replies = index_replies(posts);
        let mut thread = AssembledThread::new(root.clone(), root_fallback);

        // Walk depth-first with an explicit stack. Every post is attached at
        // most once, which also breaks reply cycles.
        let mut visited: HashSet<&str> = HashSet::from([root.id.as_str()]);
        let mut stack: Vec<(usize, &Post)> = vec![(0, root)];

        while let Some((index, parent)) = stack.pop() {
            let Some(candidates) = replies.get(parent.id.as_str()) else {
                continue;
            };

            let follow_all = self.mode == AssembleMode::FullTree || index == 0;
            let mut attached = Vec::new();
            for &child in candidates {
                if !visited.insert(child.id.as_str()) {
                    tracing::debug!(post_id = %child.id, "Post already attached, skipping");
                    continue;
                }
                if let Some(child_index) = thread.attach(index, child.clone()) {
                    attached.push((child_index, child));
                }
                if !follow_all {
                    break;
                }
            }

            stack.extend(attached.into_iter().rev());
        }

        thread.detached = posts
            .iter()
            .filter(|p| !visited.contains(p.id.as_str()))
            .map(|p| p.id.clone())
            .collect();
        if !thread.detached.is_empty() {
            tracing::debug!(
                conversation_id,
                count = thread.detached.len(),
                "Posts left out of the reply tree"
            );
        }

        Ok(thread)
    }
}

/// Group posts by the id they reply to, keeping input order within a group.
fn index_replies(posts: &[Post]) -> HashMap<&str, Vec<&Post>> {
    let mut index: HashMap<&str, Vec<&Post>> = HashMap::new();
    for post in posts {
        if let Some(parent) = post.replied_to_id.as_deref() {
            index.entry(parent).or_default().push(post);
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn post(id: &str, reply_to: Option<&str>, secs: i64) -> Post {
        let p = Post::new(id, "1", "u", "user", "text", Utc.timestamp_opt(secs, 0).unwrap());
        match reply_to {
            Some(parent) => p.replying_to(parent),
            None => p,
        }
    }

    #[test]
    fn test_empty_conversation() {
        let err = ThreadAssembler::default().assemble(&[], "1").unwrap_err();
        assert_eq!(err, AssembleError::EmptyConversation("1".to_string()));
    }

    #[test]
    fn test_single_root() {
        let thread = ThreadAssembler::default()
            .assemble(&[post("1", None, 0)], "1")
            .unwrap();

        assert!(thread.root().is_leaf());
        assert!(!thread.root_fallback);
    }

    #[test]
    fn test_cycle_is_broken() {
        // 2 and 3 reply to each other below the root
        let posts = vec![
            post("1", None, 0),
            post("2", Some("1"), 1),
            post("3", Some("2"), 2),
            post("2", Some("3"), 3),
        ];
        let thread = ThreadAssembler::default().assemble(&posts, "1").unwrap();

        assert_eq!(thread.root().preorder_ids(), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_self_reply_ignored() {
        let posts = vec![post("1", Some("1"), 0), post("2", Some("1"), 1)];
        let thread = ThreadAssembler::default().assemble(&posts, "1").unwrap();

        assert_eq!(thread.root().child_ids(), vec!["2"]);
    }

    #[test]
    fn test_long_reply_chain() {
        let mut posts = vec![post("0", None, 0)];
        for i in 1..1_000 {
            posts.push(post(&i.to_string(), Some(&(i - 1).to_string()), i));
        }

        let thread = ThreadAssembler::default().assemble(&posts, "0").unwrap();
        assert_eq!(thread.root().node_count(), 1_000);
        assert!(thread.detached.is_empty());
    }
}
