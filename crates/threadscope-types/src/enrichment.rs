use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::account::Account;

/// An influence cluster as reported by the enrichment source.
///
/// Only `id` and `name` are interpreted; every other field is carried through
/// untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Cluster {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            extra: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Latest score of an account inside one cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterScore {
    #[serde(deserialize_with = "string_or_number")]
    pub cluster_id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ClusterScore {
    pub fn new(cluster_id: impl Into<String>) -> Self {
        Self {
            cluster_id: cluster_id.into(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// One row of the account/cluster join.
///
/// Clustered accounts produce one row per membership. Unindexed accounts, and
/// indexed accounts without clusters, produce exactly one row with no cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRow {
    pub account: Account,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<Cluster>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<ClusterScore>,
}

impl EnrichedRow {
    pub fn fallback(account: Account) -> Self {
        Self {
            account,
            cluster: None,
            score: None,
        }
    }

    /// Row for one cluster the account belongs to. The score may be absent
    /// when the source lists a cluster without a latest score.
    pub fn membership(
        account: Account,
        cluster: Cluster,
        score: impl Into<Option<ClusterScore>>,
    ) -> Self {
        Self {
            account,
            cluster: Some(cluster),
            score: score.into(),
        }
    }

    pub fn account_id(&self) -> &str {
        &self.account.id
    }

    pub fn cluster_id(&self) -> Option<&str> {
        self.cluster.as_ref().map(|c| c.id.as_str())
    }

    pub fn cluster_name(&self) -> Option<&str> {
        self.cluster.as_ref().map(|c| c.name.as_str())
    }

    pub fn is_clustered(&self) -> bool {
        self.cluster.is_some()
    }

    /// Flatten into prefixed columns.
    ///
    /// Score columns are written first, then cluster columns, then account
    /// columns. A later column never overwrites a key that is already present.
    pub fn to_record(&self) -> Map<String, Value> {
        let mut record = Map::new();

        if let Some(score) = &self.score {
            record.insert(
                "latest_scores.cluster_id".to_string(),
                Value::String(score.cluster_id.clone()),
            );
            for (key, value) in &score.fields {
                record
                    .entry(format!("latest_scores.{}", key))
                    .or_insert_with(|| value.clone());
            }
        }

        if let Some(cluster) = &self.cluster {
            record
                .entry("clusters.id".to_string())
                .or_insert_with(|| Value::String(cluster.id.clone()));
            record
                .entry("clusters.name".to_string())
                .or_insert_with(|| Value::String(cluster.name.clone()));
            for (key, value) in &cluster.extra {
                record
                    .entry(format!("clusters.{}", key))
                    .or_insert_with(|| value.clone());
            }
        } else {
            record.insert("clusters.id".to_string(), Value::Null);
            record.insert("clusters.name".to_string(), Value::Null);
        }

        for (key, value) in self.account.to_columns() {
            record.entry(key).or_insert(value);
        }

        record
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}
