use std::collections::{HashMap, HashSet};
use threadscope_types::{Account, Cluster, ClusterScore, EnrichedRow};

/// Join an account with its clusters and latest scores.
///
/// Scores are matched to clusters by cluster id. Clusters the source lists
/// without a score still get a row, so every cluster yields exactly one row.
/// An account with no usable cluster yields a single fallback row.
pub fn join_rows(
    account: &Account,
    clusters: Vec<Cluster>,
    latest_scores: Vec<ClusterScore>,
) -> Vec<EnrichedRow> {
    let mut by_id: HashMap<String, Cluster> = HashMap::with_capacity(clusters.len());
    let mut cluster_order = Vec::with_capacity(clusters.len());
    for cluster in clusters {
        if !by_id.contains_key(&cluster.id) {
            cluster_order.push(cluster.id.clone());
            by_id.insert(cluster.id.clone(), cluster);
        }
    }

    let mut rows = Vec::with_capacity(by_id.len());
    let mut joined = HashSet::new();

    for score in latest_scores {
        if joined.contains(&score.cluster_id) {
            continue;
        }
        match by_id.get(&score.cluster_id) {
            Some(cluster) => {
                joined.insert(score.cluster_id.clone());
                rows.push(EnrichedRow::membership(account.clone(), cluster.clone(), score));
            }
            None => tracing::debug!(
                account_id = %account.id,
                cluster_id = %score.cluster_id,
                "Score references unknown cluster"
            ),
        }
    }

    for id in cluster_order {
        if joined.contains(&id) {
            continue;
        }
        if let Some(cluster) = by_id.remove(&id) {
            rows.push(EnrichedRow::membership(account.clone(), cluster, None));
        }
    }

    if rows.is_empty() {
        rows.push(EnrichedRow::fallback(account.clone()));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account::new("u1", "alice")
    }

    #[test]
    fn test_no_clusters_gives_fallback() {
        let rows = join_rows(&account(), Vec::new(), Vec::new());

        assert_eq!(rows.len(), 1);
        assert!(!rows[0].is_clustered());
        assert_eq!(rows[0].account_id(), "u1");
    }

    #[test]
    fn test_one_row_per_cluster() {
        let clusters = vec![
            Cluster::new("1", "Rust"),
            Cluster::new("2", "Python"),
            Cluster::new("3", "Go"),
        ];
        let scores = vec![
            ClusterScore::new("3").with_field("rank", 9),
            ClusterScore::new("1").with_field("rank", 2),
            ClusterScore::new("2").with_field("rank", 5),
        ];

        let rows = join_rows(&account(), clusters, scores);
        let ids: Vec<_> = rows.iter().filter_map(|r| r.cluster_id()).collect();

        assert_eq!(ids, vec!["3", "1", "2"]);
        assert_eq!(rows[0].score.as_ref().unwrap().fields["rank"], 9);
        assert_eq!(rows[0].cluster_name(), Some("Go"));
    }

    #[test]
    fn test_cluster_without_score_still_counted() {
        let clusters = vec![Cluster::new("1", "Rust"), Cluster::new("2", "Python")];
        let scores = vec![ClusterScore::new("2")];

        let rows = join_rows(&account(), clusters, scores);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].cluster_id(), Some("1"));
        assert!(rows[1].score.is_none());
    }

    #[test]
    fn test_unknown_and_duplicate_scores_skipped() {
        let clusters = vec![Cluster::new("1", "Rust")];
        let scores = vec![
            ClusterScore::new("1"),
            ClusterScore::new("1"),
            ClusterScore::new("404"),
        ];

        let rows = join_rows(&account(), clusters, scores);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_scores_only_gives_fallback() {
        let rows = join_rows(&account(), Vec::new(), vec![ClusterScore::new("1")]);

        assert_eq!(rows.len(), 1);
        assert!(!rows[0].is_clustered());
    }
}
