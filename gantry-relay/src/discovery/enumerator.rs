//! Concurrent cluster enumeration
//!
//! Fans out across the account → zone → cluster hierarchy: accounts are
//! listed with a single remote call, then one task per account lists its
//! zones and spawns one task per live zone to list clusters. Every task owns
//! its result and hands it to its parent over an mpsc channel; parents block
//! for exactly one message per spawned child, so a failing branch never
//! aborts its siblings.
//!
//! Partial-failure policy: branch failures are collected, not propagated.
//! The aggregate call errors only when zero clusters were gathered and more
//! than one branch failed; a lone failure among otherwise-empty results is
//! non-fatal. Returned clusters are in completion order — callers needing a
//! stable order must sort.

use gantry_common::ClusterRef;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

use super::client::CloudListingClient;
use crate::cancel::CancelToken;
use crate::error::{RelayError, RelayResult};

/// One failed branch of an enumeration fan-out
#[derive(Debug, Clone)]
pub struct BranchFailure {
    pub account: String,
    /// `None` when the account's zone listing itself failed
    pub zone: Option<String>,
    pub error: String,
}

impl BranchFailure {
    fn cancelled(account: &str, zone: Option<&str>) -> Self {
        Self {
            account: account.to_string(),
            zone: zone.map(String::from),
            error: "cancelled".to_string(),
        }
    }
}

/// Result of one enumeration call: every reachable cluster plus the branches
/// that failed along the way. Owned entirely by the caller.
#[derive(Debug, Default)]
pub struct Enumeration {
    pub clusters: Vec<ClusterRef>,
    pub failures: Vec<BranchFailure>,
}

impl Enumeration {
    fn merge(&mut self, other: Enumeration) {
        self.clusters.extend(other.clusters);
        self.failures.extend(other.failures);
    }

    /// Aggregate failure check: nothing gathered and more than one branch
    /// failed
    fn is_failed(&self) -> bool {
        self.clusters.is_empty() && self.failures.len() > 1
    }
}

/// Enumerates clusters through a [`CloudListingClient`]
pub struct ResourceEnumerator {
    client: Arc<dyn CloudListingClient>,
}

impl ResourceEnumerator {
    pub fn new(client: Arc<dyn CloudListingClient>) -> Self {
        Self { client }
    }

    /// The underlying listing client
    pub fn client(&self) -> &Arc<dyn CloudListingClient> {
        &self.client
    }

    /// List every reachable cluster across all accounts and live zones.
    ///
    /// Accounts are listed sequentially (a single, already-paginated remote
    /// call); everything below fans out concurrently.
    pub async fn list_all_clusters(&self, cancel: &CancelToken) -> RelayResult<Enumeration> {
        if cancel.is_cancelled() {
            return Err(RelayError::Cancelled);
        }
        let accounts = self.client.list_accounts().await?;

        let (tx, mut rx) = mpsc::channel::<Enumeration>(1);
        let spawned = accounts.len();
        for account in accounts {
            let client = Arc::clone(&self.client);
            let cancel = cancel.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = enumerate_account(client, &cancel, &account.id).await;
                let _ = tx.send(result).await;
            });
        }
        drop(tx);

        let mut aggregate = Enumeration::default();
        for _ in 0..spawned {
            let branch = rx
                .recv()
                .await
                .ok_or_else(|| RelayError::Internal("result channel closed early".to_string()))?;
            aggregate.merge(branch);
        }

        self.finish(cancel, aggregate)
    }

    /// List every reachable cluster in one account (fan-out over zones only)
    pub async fn list_clusters_for_account(
        &self,
        cancel: &CancelToken,
        account: &str,
    ) -> RelayResult<Enumeration> {
        if cancel.is_cancelled() {
            return Err(RelayError::Cancelled);
        }
        let aggregate = enumerate_account(Arc::clone(&self.client), cancel, account).await;
        self.finish(cancel, aggregate)
    }

    /// List the clusters in one (account, zone) pair: a single remote call,
    /// no concurrency
    pub async fn list_clusters_for_account_and_zone(
        &self,
        cancel: &CancelToken,
        account: &str,
        zone: &str,
    ) -> RelayResult<Vec<ClusterRef>> {
        if cancel.is_cancelled() {
            return Err(RelayError::Cancelled);
        }
        self.client.list_clusters(account, zone).await
    }

    fn finish(&self, cancel: &CancelToken, aggregate: Enumeration) -> RelayResult<Enumeration> {
        if cancel.is_cancelled() {
            return Err(RelayError::Cancelled);
        }
        if aggregate.is_failed() {
            return Err(RelayError::Enumeration {
                failures: aggregate.failures.len(),
            });
        }
        Ok(aggregate)
    }
}

/// Zone-level fan-out for one account. Failures are folded into the returned
/// [`Enumeration`] rather than propagated: a broken zone listing becomes one
/// account-level branch failure, a broken cluster listing one zone-level
/// branch failure.
async fn enumerate_account(
    client: Arc<dyn CloudListingClient>,
    cancel: &CancelToken,
    account: &str,
) -> Enumeration {
    let mut aggregate = Enumeration::default();

    if cancel.is_cancelled() {
        aggregate.failures.push(BranchFailure::cancelled(account, None));
        return aggregate;
    }

    let zones = match client.list_zones(account).await {
        Ok(zones) => zones,
        Err(err) => {
            warn!(account, error = %err, "failed to list zones");
            aggregate.failures.push(BranchFailure {
                account: account.to_string(),
                zone: None,
                error: err.to_string(),
            });
            return aggregate;
        }
    };

    let (tx, mut rx) = mpsc::channel::<Result<Vec<ClusterRef>, BranchFailure>>(1);
    let mut spawned = 0;
    for zone in zones.into_iter().filter(|z| z.is_live()) {
        spawned += 1;
        let client = Arc::clone(&client);
        let cancel = cancel.clone();
        let tx = tx.clone();
        let account = account.to_string();
        tokio::spawn(async move {
            if cancel.is_cancelled() {
                let _ = tx
                    .send(Err(BranchFailure::cancelled(&account, Some(&zone.name))))
                    .await;
                return;
            }
            let result = match client.list_clusters(&account, &zone.name).await {
                Ok(clusters) => Ok(clusters),
                Err(err) => {
                    warn!(account, zone = %zone.name, error = %err, "failed to list clusters");
                    Err(BranchFailure {
                        account,
                        zone: Some(zone.name),
                        error: err.to_string(),
                    })
                }
            };
            let _ = tx.send(result).await;
        });
    }
    drop(tx);

    for _ in 0..spawned {
        match rx.recv().await {
            Some(Ok(clusters)) => aggregate.clusters.extend(clusters),
            Some(Err(failure)) => aggregate.failures.push(failure),
            None => break,
        }
    }
    aggregate
}
