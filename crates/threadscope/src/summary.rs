use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use threadscope_types::{EnrichedRow, Post};

/// Aggregate statistics shown above the tree
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ThreadSummary {
    pub total_posts: usize,
    pub unique_accounts: usize,
    pub unique_clusters: usize,
    /// Accounts that belong to no cluster
    pub unclustered_accounts: usize,
    /// Posting accounts, most active first
    pub activity: Vec<AccountActivity>,
    /// Accounts per cluster, largest first
    pub communities: Vec<CommunityCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountActivity {
    pub username: String,
    pub post_count: usize,
    pub clusters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunityCount {
    pub name: String,
    pub accounts: usize,
}

impl ThreadSummary {
    pub fn build(posts: &[Post], rows: &[EnrichedRow]) -> Self {
        let mut post_counts: HashMap<&str, (&str, usize)> = HashMap::new();
        for post in posts {
            post_counts
                .entry(post.author_id.as_str())
                .or_insert((post.author_username.as_str(), 0))
                .1 += 1;
        }

        let mut clusters_by_account: HashMap<&str, Vec<String>> = HashMap::new();
        let mut accounts_by_cluster: HashMap<&str, BTreeSet<&str>> = HashMap::new();
        let mut unclustered = HashSet::new();

        for row in rows {
            match row.cluster_name() {
                Some(name) => {
                    clusters_by_account
                        .entry(row.account_id())
                        .or_default()
                        .push(name.to_string());
                    accounts_by_cluster
                        .entry(name)
                        .or_default()
                        .insert(row.account_id());
                }
                None => {
                    unclustered.insert(row.account_id());
                }
            }
        }

        let mut activity: Vec<AccountActivity> = post_counts
            .iter()
            .map(|(id, (username, count))| AccountActivity {
                username: username.to_string(),
                post_count: *count,
                clusters: clusters_by_account.get(id).cloned().unwrap_or_default(),
            })
            .collect();
        activity.sort_by(|a, b| {
            b.post_count
                .cmp(&a.post_count)
                .then_with(|| a.username.cmp(&b.username))
        });

        let mut communities: Vec<CommunityCount> = accounts_by_cluster
            .iter()
            .map(|(name, accounts)| CommunityCount {
                name: name.to_string(),
                accounts: accounts.len(),
            })
            .collect();
        communities.sort_by(|a, b| b.accounts.cmp(&a.accounts).then_with(|| a.name.cmp(&b.name)));

        Self {
            total_posts: posts.len(),
            unique_accounts: post_counts.len(),
            unique_clusters: communities.len(),
            unclustered_accounts: unclustered.len(),
            activity,
            communities,
        }
    }

    /// Slice of the community ranking, clamped to what exists
    pub fn window(&self, start: usize, end: usize) -> &[CommunityCount] {
        let end = end.min(self.communities.len());
        let start = start.min(end);
        &self.communities[start..end]
    }
}
