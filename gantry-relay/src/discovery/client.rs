//! Provider listing boundary
//!
//! The cloud provider's resource API is an external collaborator behind the
//! [`CloudListingClient`] trait; gantry never talks to a concrete provider
//! SDK directly. `StaticListingClient` is the fixture implementation used by
//! tests and dry-run deployments.

use async_trait::async_trait;
use gantry_common::{CloudAccount, ClusterAuth, ClusterRef, ProviderCredential, Zone};
use std::sync::Arc;

use crate::error::RelayResult;

/// Read access to the provider's account/zone/cluster hierarchy
#[async_trait]
pub trait CloudListingClient: Send + Sync {
    async fn list_accounts(&self) -> RelayResult<Vec<CloudAccount>>;

    async fn list_zones(&self, account: &str) -> RelayResult<Vec<Zone>>;

    async fn list_clusters(&self, account: &str, zone: &str) -> RelayResult<Vec<ClusterRef>>;
}

/// Builds a listing client scoped to a caller's provider credential
#[async_trait]
pub trait ListingClientFactory: Send + Sync {
    async fn client_for(
        &self,
        credential: &ProviderCredential,
    ) -> RelayResult<Arc<dyn CloudListingClient>>;
}

/// Fixture client returning one account, one live zone and one sample
/// cluster. Mostly useful for testing and for running the service without
/// provider access.
#[derive(Debug, Clone, Default)]
pub struct StaticListingClient;

impl StaticListingClient {
    pub const ACCOUNT: &'static str = "gantry-integration";
    pub const ZONE: &'static str = "us-central1-a";

    /// A sample cluster object for the provided account and zone
    pub fn sample_cluster(account: &str, zone: &str) -> ClusterRef {
        ClusterRef {
            account: account.to_string(),
            zone: zone.to_string(),
            cluster_id: "gantry-integration".to_string(),
            endpoint: "35.184.163.242".to_string(),
            ca_certificate: Some("PGNsdXN0ZXJfY2FfY2VydGlmaWNhdGU+".to_string()),
            auth: ClusterAuth::BasicAuth {
                username: "admin".to_string(),
                password: "pa$$w0rd".to_string(),
            },
            reported_version: "1.8.5-gke.0".to_string(),
        }
    }
}

#[async_trait]
impl CloudListingClient for StaticListingClient {
    async fn list_accounts(&self) -> RelayResult<Vec<CloudAccount>> {
        Ok(vec![CloudAccount {
            id: Self::ACCOUNT.to_string(),
            display_name: Some("Gantry integration".to_string()),
        }])
    }

    async fn list_zones(&self, _account: &str) -> RelayResult<Vec<Zone>> {
        Ok(vec![Zone::up(Self::ZONE)])
    }

    async fn list_clusters(&self, account: &str, zone: &str) -> RelayResult<Vec<ClusterRef>> {
        Ok(vec![Self::sample_cluster(account, zone)])
    }
}

/// Factory handing out the same static client regardless of credential
#[derive(Debug, Clone, Default)]
pub struct StaticClientFactory;

#[async_trait]
impl ListingClientFactory for StaticClientFactory {
    async fn client_for(
        &self,
        _credential: &ProviderCredential,
    ) -> RelayResult<Arc<dyn CloudListingClient>> {
        Ok(Arc::new(StaticListingClient))
    }
}
