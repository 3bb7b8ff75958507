//! Common types shared between gantry-relay and external consumers (CLIs,
//! transport wrappers). All of these are plain value objects: no shared
//! mutable state, nothing here talks to the network.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A cloud account (provider project). Lifecycle is external; gantry only
/// ever reads these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CloudAccount {
    /// Opaque provider-side identifier
    pub id: String,
    /// Human-readable name, when the provider reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl CloudAccount {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
        }
    }
}

/// Liveness of a zone as reported by the provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ZoneStatus {
    Up,
    Down,
}

/// A zone within a cloud account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Zone {
    pub name: String,
    pub status: ZoneStatus,
}

impl Zone {
    pub fn up(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ZoneStatus::Up,
        }
    }

    pub fn down(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ZoneStatus::Down,
        }
    }

    pub fn is_live(&self) -> bool {
        self.status == ZoneStatus::Up
    }
}

/// Credential material for addressing a cluster's API server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ClusterAuth {
    /// TLS client certificate + key
    ClientCertificate {
        certificate: String,
        key: String,
    },
    /// Bearer token / shared secret
    SharedSecret { token: String },
    /// HTTP basic auth
    BasicAuth { username: String, password: String },
}

/// A discovered managed cluster: identity, endpoint, credential material and
/// the software version it reports. Created transiently per enumeration call
/// and never persisted by gantry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterRef {
    /// Owning account identifier
    pub account: String,
    /// Owning zone name
    pub zone: String,
    /// Opaque cluster identifier
    pub cluster_id: String,
    /// API server endpoint (host or host:port, scheme-less)
    pub endpoint: String,
    /// Cluster CA certificate (base64 PEM), when reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_certificate: Option<String>,
    /// Credential material for the cluster's API server
    pub auth: ClusterAuth,
    /// Software version the cluster reports (e.g. "1.9.2-gke.1")
    pub reported_version: String,
}

/// Projection of a [`ClusterRef`] safe to hand back to callers: identifiers
/// and version only, no endpoint or credential material.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterSummary {
    pub account: String,
    pub zone: String,
    pub cluster_id: String,
    pub reported_version: String,
}

impl From<&ClusterRef> for ClusterSummary {
    fn from(cluster: &ClusterRef) -> Self {
        Self {
            account: cluster.account.clone(),
            zone: cluster.zone.clone(),
            cluster_id: cluster.cluster_id.clone(),
            reported_version: cluster.reported_version.clone(),
        }
    }
}

/// A caller's provider credential, as resolved by the external identity
/// service (an OAuth access token or equivalent)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderCredential {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl ProviderCredential {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            expiry: None,
        }
    }
}

/// A request to run an admin-tool command against a target cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayRequest {
    /// Caller identity, as established by the upstream transport layer
    pub caller_id: String,
    pub account: String,
    pub zone: String,
    pub cluster_id: String,
    /// Explicit tool version; when absent the version is resolved from the
    /// cluster's reported version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_version: Option<String>,
    /// Argument vector, passed through verbatim (never shell-interpreted)
    pub args: Vec<String>,
}

impl RelayRequest {
    /// Check the request names a concrete target. Argument lists may be
    /// empty (some tools print usage), identifiers may not.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("caller_id", &self.caller_id),
            ("account", &self.account),
            ("zone", &self.zone),
            ("cluster_id", &self.cluster_id),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Validation(format!("{} must not be empty", field)));
            }
        }
        Ok(())
    }
}

/// Captured result of a relayed command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayResponse {
    /// Combined stdout/stderr of the tool process
    pub output: String,
    /// Tool version that was actually invoked
    pub tool_version: String,
    /// Process exit code (0 on success)
    pub exit_code: i32,
    /// When the command finished
    pub completed_at: DateTime<Utc>,
}

/// Common error kinds shared across gantry crates
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cluster not found: {0}")]
    ClusterNotFound(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("System error: {0}")]
    System(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_cluster() -> ClusterRef {
        ClusterRef {
            account: "acme-prod".to_string(),
            zone: "us-central1-a".to_string(),
            cluster_id: "edge-1".to_string(),
            endpoint: "35.184.163.242".to_string(),
            ca_certificate: Some("Y2EtZGF0YQ==".to_string()),
            auth: ClusterAuth::BasicAuth {
                username: "admin".to_string(),
                password: "pa55".to_string(),
            },
            reported_version: "1.9.2-gke.1".to_string(),
        }
    }

    #[test]
    fn test_summary_omits_sensitive_fields() {
        let summary = ClusterSummary::from(&sample_cluster());
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("edge-1"));
        assert!(!json.contains("35.184.163.242"));
        assert!(!json.contains("pa55"));
    }

    #[test]
    fn test_zone_liveness() {
        assert!(Zone::up("us-central1-a").is_live());
        assert!(!Zone::down("us-central1-b").is_live());
    }

    #[test]
    fn test_relay_request_validation() {
        let mut req = RelayRequest {
            caller_id: "user-1".to_string(),
            account: "acme-prod".to_string(),
            zone: "us-central1-a".to_string(),
            cluster_id: "edge-1".to_string(),
            tool_version: None,
            args: vec![],
        };
        assert!(req.validate().is_ok());

        req.cluster_id = "  ".to_string();
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("cluster_id"));
    }

    #[test]
    fn test_cluster_auth_serde_tagging() {
        let auth = ClusterAuth::SharedSecret {
            token: "s3cret".to_string(),
        };
        let json = serde_json::to_string(&auth).unwrap();
        assert!(json.contains("\"kind\":\"shared_secret\""));
        let back: ClusterAuth = serde_json::from_str(&json).unwrap();
        assert_eq!(back, auth);
    }
}
