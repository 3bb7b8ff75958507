//! Command relay orchestration
//!
//! The end-to-end protocol from "caller wants to run a cluster-admin
//! command" to "output returned": resolve the caller's provider credential,
//! locate the target cluster, materialize a connection config, resolve a
//! compatible tool version, execute out-of-process, return the captured
//! output. Every step is sequential; only the enumerator underneath fans
//! out. Collaborators are injected at construction, there is no global
//! registry.

pub mod connection;
pub mod credentials;
pub mod inventory;
pub mod runner;

use gantry_common::{CloudAccount, ClusterRef, ClusterSummary, RelayRequest, RelayResponse};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::cancel::CancelToken;
use crate::discovery::{ListingClientFactory, ResourceEnumerator};
use crate::error::{RelayError, RelayResult};
use connection::{ConnectionConfig, ScopedConnectionFile};
use credentials::CredentialStore;
use inventory::ToolInventory;
use runner::ToolRunner;

/// Orchestrates discovery, version resolution and command execution
pub struct CommandRelay {
    credentials: Arc<dyn CredentialStore>,
    clients: Arc<dyn ListingClientFactory>,
    inventory: ToolInventory,
    runner: Arc<dyn ToolRunner>,
}

impl CommandRelay {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        clients: Arc<dyn ListingClientFactory>,
        inventory: ToolInventory,
        runner: Arc<dyn ToolRunner>,
    ) -> Self {
        Self {
            credentials,
            clients,
            inventory,
            runner,
        }
    }

    /// List the caller's cloud accounts
    pub async fn list_accounts(
        &self,
        cancel: &CancelToken,
        caller_id: &str,
    ) -> RelayResult<Vec<CloudAccount>> {
        let enumerator = self.enumerator_for(caller_id).await?;
        if cancel.is_cancelled() {
            return Err(RelayError::Cancelled);
        }
        let accounts = enumerator.client().list_accounts().await?;
        info!(caller_id, count = accounts.len(), "accounts retrieved");
        Ok(accounts)
    }

    /// List every cluster reachable with the caller's credential, as
    /// identifier-only summaries
    pub async fn list_clusters(
        &self,
        cancel: &CancelToken,
        caller_id: &str,
    ) -> RelayResult<Vec<ClusterSummary>> {
        let enumerator = self.enumerator_for(caller_id).await?;
        let enumeration = enumerator.list_all_clusters(cancel).await?;
        info!(
            caller_id,
            count = enumeration.clusters.len(),
            failed_branches = enumeration.failures.len(),
            "clusters retrieved"
        );
        Ok(summarize(&enumeration.clusters))
    }

    /// List the clusters of one account
    pub async fn list_clusters_for_account(
        &self,
        cancel: &CancelToken,
        caller_id: &str,
        account: &str,
    ) -> RelayResult<Vec<ClusterSummary>> {
        let enumerator = self.enumerator_for(caller_id).await?;
        let enumeration = enumerator.list_clusters_for_account(cancel, account).await?;
        info!(
            caller_id,
            account,
            count = enumeration.clusters.len(),
            failed_branches = enumeration.failures.len(),
            "clusters retrieved"
        );
        Ok(summarize(&enumeration.clusters))
    }

    /// Relay one command to its target cluster.
    ///
    /// Any failure before execution is terminal and the tool is never
    /// invoked; a non-zero exit surfaces as [`RelayError::CommandFailed`]
    /// with the captured output preserved. The connection-config file is
    /// removed on every exit path once created.
    pub async fn relay(
        &self,
        cancel: &CancelToken,
        request: &RelayRequest,
    ) -> RelayResult<RelayResponse> {
        request.validate()?;
        let request_id = Uuid::new_v4();
        info!(
            %request_id,
            caller_id = %request.caller_id,
            account = %request.account,
            zone = %request.zone,
            cluster_id = %request.cluster_id,
            "relaying command"
        );

        // 1-2. Credential, then cluster lookup
        let enumerator = self.enumerator_for(&request.caller_id).await?;
        let cluster = self.find_cluster(cancel, &enumerator, request).await?;

        // 3. Materialize the connection config; the guard holds the file
        // until this function returns, whichever way it returns
        let config = ConnectionConfig::for_cluster(&cluster);
        let scoped = ScopedConnectionFile::materialize(&config)?;

        // 4. Resolve the tool version: an explicit requested version still
        // goes through best-match against the installed set; unresolved
        // degrades to `latest`, never aborts
        let requested = request
            .tool_version
            .as_deref()
            .unwrap_or(&cluster.reported_version);
        let version = self.inventory.resolve(requested);
        info!(%request_id, requested, resolved = %version, "tool version resolved");

        // 5. Execute with the argument vector passed through verbatim
        let output = self
            .runner
            .run(&version, scoped.path(), &request.args)
            .await?;

        // 6. Surface non-zero exits as errors, output preserved
        if !output.success() {
            return Err(RelayError::CommandFailed {
                exit_code: output.exit_code,
                output: output.output,
            });
        }
        Ok(RelayResponse {
            output: output.output,
            tool_version: version,
            exit_code: output.exit_code,
            completed_at: chrono::Utc::now(),
        })
    }

    async fn find_cluster(
        &self,
        cancel: &CancelToken,
        enumerator: &ResourceEnumerator,
        request: &RelayRequest,
    ) -> RelayResult<ClusterRef> {
        let clusters = enumerator
            .list_clusters_for_account_and_zone(cancel, &request.account, &request.zone)
            .await?;
        clusters
            .into_iter()
            .find(|c| c.cluster_id == request.cluster_id)
            .ok_or_else(|| RelayError::ClusterNotFound {
                account: request.account.clone(),
                zone: request.zone.clone(),
                cluster_id: request.cluster_id.clone(),
            })
    }

    async fn enumerator_for(&self, caller_id: &str) -> RelayResult<ResourceEnumerator> {
        let credential = self.credentials.credential_for(caller_id).await?;
        let client = self.clients.client_for(&credential).await?;
        Ok(ResourceEnumerator::new(client))
    }

    pub fn inventory(&self) -> &ToolInventory {
        &self.inventory
    }
}

fn summarize(clusters: &[ClusterRef]) -> Vec<ClusterSummary> {
    clusters.iter().map(ClusterSummary::from).collect()
}
