use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::future;
use std::sync::Arc;
use std::time::Duration;
use threadscope_types::{Account, EnrichConfig, EnrichedRow};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::cancel::CancellationToken;
use crate::error::{EnrichError, Result};
use crate::join::join_rows;
use crate::traits::{EnrichmentSource, InfluenceLookup};

/// Counters describing how a batch went
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichStats {
    /// Accounts the source returned cluster data for (possibly zero clusters)
    pub indexed: usize,
    pub unindexed: usize,
    /// Lookups that errored or timed out
    pub failed: usize,
    /// Accounts still outstanding when the batch was cancelled or timed out
    pub abandoned: usize,
    pub cancelled: bool,
    pub timed_out: bool,
}

#[derive(Debug, Clone)]
pub struct EnrichReport {
    /// Rows in completion order
    pub rows: Vec<EnrichedRow>,
    pub stats: EnrichStats,
}

/// Fans per-account lookups out over a bounded pool and joins the results
/// into enriched rows.
///
/// A failing lookup only affects its own account, which falls back to a
/// single row without cluster data. Every input account is represented in
/// the output.
#[derive(Clone)]
pub struct AccountEnricher {
    source: Arc<dyn EnrichmentSource>,
    config: EnrichConfig,
}

enum Interrupt {
    Cancelled,
    TimedOut,
}

impl AccountEnricher {
    pub fn new(source: Arc<dyn EnrichmentSource>, config: EnrichConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &EnrichConfig {
        &self.config
    }

    pub async fn enrich(&self, accounts: Vec<Account>) -> Vec<EnrichedRow> {
        self.enrich_with_cancel(accounts, &CancellationToken::new())
            .await
            .rows
    }

    /// Enrich `accounts`, stopping early if `cancel` fires or the batch
    /// timeout elapses. Dropping the returned future aborts all outstanding
    /// lookups.
    pub async fn enrich_with_cancel(
        &self,
        accounts: Vec<Account>,
        cancel: &CancellationToken,
    ) -> EnrichReport {
        let accounts = distinct(accounts);
        let order: Vec<String> = accounts.iter().map(|a| a.id.clone()).collect();
        let mut pending: HashMap<String, Account> = accounts
            .iter()
            .map(|a| (a.id.clone(), a.clone()))
            .collect();

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let mut join_set = JoinSet::new();

        for account in accounts {
            let source = Arc::clone(&self.source);
            let semaphore = Arc::clone(&semaphore);
            let timeout = self.config.request_timeout;

            join_set.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(permit) => {
                        let outcome = lookup(source.as_ref(), &account.id, timeout).await;
                        drop(permit);
                        outcome
                    }
                    Err(_) => Err(EnrichError::Cancelled),
                };
                (account, outcome)
            });
        }

        // A deadline too far out to represent is the same as none
        let deadline = self
            .config
            .batch_timeout
            .and_then(|t| Instant::now().checked_add(t));
        let mut rows = Vec::new();
        let mut stats = EnrichStats::default();

        loop {
            let joined = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(Interrupt::Cancelled),
                _ = wait_until(deadline) => Err(Interrupt::TimedOut),
                joined = join_set.join_next() => Ok(joined),
            };

            match joined {
                Ok(None) => break,
                Ok(Some(Ok((account, outcome)))) => {
                    pending.remove(&account.id);
                    rows.extend(rows_for(account, outcome, &mut stats));
                }
                Ok(Some(Err(e))) => {
                    // The account stays pending and is filled in below
                    tracing::error!("Enrichment task failed: {}", e);
                }
                Err(interrupt) => {
                    match interrupt {
                        Interrupt::Cancelled => {
                            tracing::warn!(outstanding = pending.len(), "Enrichment batch cancelled");
                            stats.cancelled = true;
                        }
                        Interrupt::TimedOut => {
                            tracing::warn!(outstanding = pending.len(), "Enrichment batch timed out");
                            stats.timed_out = true;
                        }
                    }
                    join_set.abort_all();
                    stats.abandoned = pending.len();
                    break;
                }
            }
        }

        // Accounts whose task panicked or never finished
        for id in order {
            if let Some(account) = pending.remove(&id) {
                if !stats.cancelled && !stats.timed_out {
                    stats.failed += 1;
                }
                rows.push(EnrichedRow::fallback(account));
            }
        }

        tracing::info!(
            rows = rows.len(),
            indexed = stats.indexed,
            unindexed = stats.unindexed,
            failed = stats.failed,
            abandoned = stats.abandoned,
            "Enrichment finished"
        );

        EnrichReport { rows, stats }
    }
}

async fn lookup(
    source: &dyn EnrichmentSource,
    account_id: &str,
    timeout: Duration,
) -> Result<InfluenceLookup> {
    match tokio::time::timeout(timeout, source.influence(account_id)).await {
        Ok(result) => result,
        Err(_) => Err(EnrichError::Timeout(timeout.as_millis() as u64)),
    }
}

fn rows_for(
    account: Account,
    outcome: Result<InfluenceLookup>,
    stats: &mut EnrichStats,
) -> Vec<EnrichedRow> {
    match outcome {
        Ok(InfluenceLookup::Indexed {
            clusters,
            latest_scores,
        }) => {
            stats.indexed += 1;
            join_rows(&account, clusters, latest_scores)
        }
        Ok(InfluenceLookup::Unindexed { reason }) => {
            tracing::info!("user {} is not indexed: {}", account.username, reason);
            stats.unindexed += 1;
            vec![EnrichedRow::fallback(account)]
        }
        Err(e) => {
            tracing::warn!("Enrichment lookup failed for user {}: {}", account.username, e);
            stats.failed += 1;
            vec![EnrichedRow::fallback(account)]
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => future::pending().await,
    }
}

fn distinct(accounts: Vec<Account>) -> Vec<Account> {
    let mut seen = HashSet::new();
    accounts
        .into_iter()
        .filter(|a| seen.insert(a.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Unindexed;

    #[async_trait]
    impl EnrichmentSource for Unindexed {
        async fn influence(&self, _account_id: &str) -> Result<InfluenceLookup> {
            Ok(InfluenceLookup::Unindexed {
                reason: "not found".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let enricher = AccountEnricher::new(Arc::new(Unindexed), EnrichConfig::default());
        assert!(enricher.enrich(Vec::new()).await.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_accounts_queried_once() {
        let enricher = AccountEnricher::new(Arc::new(Unindexed), EnrichConfig::default());
        let report = enricher
            .enrich_with_cancel(
                vec![Account::new("1", "a"), Account::new("1", "a"), Account::new("2", "b")],
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.stats.unindexed, 2);
    }

    #[tokio::test]
    async fn test_unrepresentable_batch_timeout_means_no_deadline() {
        let config = EnrichConfig::new()
            .with_request_timeout(Duration::MAX)
            .with_batch_timeout(Some(Duration::MAX));
        let enricher = AccountEnricher::new(Arc::new(Unindexed), config);

        let report = enricher
            .enrich_with_cancel(vec![Account::new("1", "a")], &CancellationToken::new())
            .await;

        assert_eq!(report.rows.len(), 1);
        assert!(!report.stats.timed_out);
        assert_eq!(report.stats.unindexed, 1);
    }
}
