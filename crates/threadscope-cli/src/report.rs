use std::fmt::Write;
use threadscope::{render_tree, CommunityCount, EnrichStats, Exploration, ThreadSummary};

const BAR_WIDTH: usize = 40;
const ACTIVE_ACCOUNTS_SHOWN: usize = 10;

/// Full text report: summary, community chart and reply tree
pub fn render_report(exploration: &Exploration, top: usize) -> String {
    let mut out = String::new();
    let summary = &exploration.summary;

    let _ = writeln!(
        out,
        "Conversation {} (requested post {})",
        exploration.conversation.conversation_id, exploration.conversation.requested_id
    );
    out.push('\n');
    out.push_str(&render_summary(summary));
    out.push_str(&render_enrichment(&exploration.enrich_stats));

    let communities = summary.window(0, top);
    if !communities.is_empty() {
        let _ = writeln!(out, "\nTop {} communities", communities.len());
        out.push_str(&render_bar_chart(communities, BAR_WIDTH));
    }

    out.push_str("\nThread\n");
    out.push_str(&render_tree(&exploration.thread));

    if !exploration.thread.detached.is_empty() {
        let _ = writeln!(
            out,
            "\n{} post(s) not connected to the thread: {}",
            exploration.thread.detached.len(),
            exploration.thread.detached.join(", ")
        );
    }

    out
}

pub fn render_summary(summary: &ThreadSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Posts:                    {}", summary.total_posts);
    let _ = writeln!(out, "Accounts:                 {}", summary.unique_accounts);
    let _ = writeln!(out, "Clusters:                 {}", summary.unique_clusters);
    let _ = writeln!(out, "Accounts without cluster: {}", summary.unclustered_accounts);

    if !summary.activity.is_empty() {
        out.push_str("\nMost active accounts\n");
        for activity in summary.activity.iter().take(ACTIVE_ACCOUNTS_SHOWN) {
            let clusters = if activity.clusters.is_empty() {
                "-".to_string()
            } else {
                activity.clusters.join(", ")
            };
            let _ = writeln!(
                out,
                "  {:<20} {:>4}  {}",
                activity.username, activity.post_count, clusters
            );
        }
    }

    out
}

fn render_enrichment(stats: &EnrichStats) -> String {
    let mut line = format!(
        "\nEnrichment: {} indexed, {} unindexed, {} failed",
        stats.indexed, stats.unindexed, stats.failed
    );
    if stats.cancelled {
        let _ = write!(line, ", cancelled with {} outstanding", stats.abandoned);
    } else if stats.timed_out {
        let _ = write!(line, ", timed out with {} outstanding", stats.abandoned);
    }
    line.push('\n');
    line
}

/// Horizontal bars scaled so the largest community spans `width` cells.
/// A non-empty community always gets at least one cell.
pub fn render_bar_chart(communities: &[CommunityCount], width: usize) -> String {
    let max = communities.iter().map(|c| c.accounts).max().unwrap_or(0);
    let label_width = communities
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for community in communities {
        let cells = if max == 0 {
            0
        } else {
            (community.accounts * width / max).max(usize::from(community.accounts > 0))
        };
        let _ = writeln!(
            out,
            "  {:<label_width$} │{} {}",
            community.name,
            "█".repeat(cells),
            community.accounts,
            label_width = label_width
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use threadscope::AccountActivity;

    fn community(name: &str, accounts: usize) -> CommunityCount {
        CommunityCount {
            name: name.to_string(),
            accounts,
        }
    }

    #[test]
    fn test_bar_chart_scales_to_largest() {
        let chart = render_bar_chart(&[community("rust", 4), community("db", 1)], 8);

        assert_eq!(chart, "  rust │████████ 4\n  db   │██ 1\n");
    }

    #[test]
    fn test_small_community_keeps_a_cell() {
        let chart = render_bar_chart(&[community("big", 100), community("tiny", 1)], 10);

        assert!(chart.contains("tiny │█ 1"));
    }

    #[test]
    fn test_empty_chart() {
        assert_eq!(render_bar_chart(&[], 10), "");
    }

    #[test]
    fn test_summary_lists_activity() {
        let summary = ThreadSummary {
            total_posts: 3,
            unique_accounts: 2,
            unique_clusters: 1,
            unclustered_accounts: 1,
            activity: vec![
                AccountActivity {
                    username: "alice".to_string(),
                    post_count: 2,
                    clusters: vec!["rust".to_string()],
                },
                AccountActivity {
                    username: "bob".to_string(),
                    post_count: 1,
                    clusters: Vec::new(),
                },
            ],
            communities: vec![community("rust", 1)],
        };

        let text = render_summary(&summary);

        assert!(text.contains("Posts:                    3"));
        assert!(text.contains("Accounts without cluster: 1"));
        assert!(text.contains("alice"));
        assert!(text.lines().any(|l| l.starts_with("  bob") && l.ends_with('-')));
    }

    #[test]
    fn test_interrupted_enrichment_is_reported() {
        let stats = EnrichStats {
            indexed: 3,
            timed_out: true,
            abandoned: 2,
            ..EnrichStats::default()
        };

        let line = render_enrichment(&stats);

        assert!(line.contains("3 indexed"));
        assert!(line.ends_with("timed out with 2 outstanding\n"));
    }
}
