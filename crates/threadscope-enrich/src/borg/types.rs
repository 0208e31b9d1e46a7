use serde::{Deserialize, Serialize};
use serde_json::Value;
use threadscope_types::{Cluster, ClusterScore};

use crate::traits::InfluenceLookup;

/// Body of `GET /influence/influencers/{platform}:{id}/`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InfluenceResponse {
    Error {
        error: Value,
    },
    Influence {
        #[serde(default)]
        clusters: Vec<Cluster>,
        #[serde(default)]
        latest_scores: Vec<ClusterScore>,
    },
}

impl From<InfluenceResponse> for InfluenceLookup {
    fn from(response: InfluenceResponse) -> Self {
        match response {
            InfluenceResponse::Error { error } => InfluenceLookup::Unindexed {
                reason: match error {
                    Value::String(s) => s,
                    other => other.to_string(),
                },
            },
            InfluenceResponse::Influence {
                clusters,
                latest_scores,
            } => InfluenceLookup::Indexed {
                clusters,
                latest_scores,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_body() {
        let response: InfluenceResponse =
            serde_json::from_value(json!({"error": "Influencer not found"})).unwrap();

        assert_eq!(
            InfluenceLookup::from(response),
            InfluenceLookup::Unindexed {
                reason: "Influencer not found".to_string()
            }
        );
    }

    #[test]
    fn test_influence_body() {
        let response: InfluenceResponse = serde_json::from_value(json!({
            "clusters": [{"id": 4, "name": "Data Science", "slug": "data-science"}],
            "latest_scores": [{"cluster_id": 4, "rank": 12, "score": 0.83}]
        }))
        .unwrap();

        match InfluenceLookup::from(response) {
            InfluenceLookup::Indexed {
                clusters,
                latest_scores,
            } => {
                assert_eq!(clusters[0].id, "4");
                assert_eq!(latest_scores[0].cluster_id, "4");
            }
            other => panic!("expected indexed lookup, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let response: InfluenceResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            InfluenceLookup::from(response),
            InfluenceLookup::Indexed { ref clusters, .. } if clusters.is_empty()
        ));
    }
}
