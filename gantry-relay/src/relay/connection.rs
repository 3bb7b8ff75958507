//! Connection-config materialization
//!
//! Builds the kubeconfig-shaped YAML document addressing one cluster and
//! writes it to a uniquely named, caller-invisible temp file. The file is
//! removed when the [`ScopedConnectionFile`] guard drops, which covers every
//! exit path of a relay call — success, execution failure, or an earlier
//! abort after creation.

use gantry_common::{ClusterAuth, ClusterRef};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::{RelayError, RelayResult};

/// Kubeconfig-shaped connection document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionConfig {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    #[serde(rename = "current-context")]
    pub current_context: String,
    pub contexts: Vec<ContextItem>,
    pub clusters: Vec<ClusterItem>,
    pub users: Vec<UserItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContextItem {
    pub name: String,
    pub context: ContextEntry,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContextEntry {
    pub cluster: String,
    pub user: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterItem {
    pub name: String,
    pub cluster: ClusterEntry,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterEntry {
    #[serde(
        rename = "certificate-authority-data",
        skip_serializing_if = "Option::is_none"
    )]
    pub certificate_authority_data: Option<String>,
    pub server: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserItem {
    pub name: String,
    pub user: UserEntry,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UserEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(
        rename = "client-certificate-data",
        skip_serializing_if = "Option::is_none"
    )]
    pub client_certificate_data: Option<String>,
    #[serde(rename = "client-key-data", skip_serializing_if = "Option::is_none")]
    pub client_key_data: Option<String>,
}

impl ConnectionConfig {
    /// Build the document for one discovered cluster
    pub fn for_cluster(cluster: &ClusterRef) -> Self {
        let user_name = format!("{}-admin", cluster.cluster_id);
        let user = match &cluster.auth {
            ClusterAuth::BasicAuth { username, password } => UserEntry {
                username: Some(username.clone()),
                password: Some(password.clone()),
                ..Default::default()
            },
            ClusterAuth::SharedSecret { token } => UserEntry {
                token: Some(token.clone()),
                ..Default::default()
            },
            ClusterAuth::ClientCertificate { certificate, key } => UserEntry {
                client_certificate_data: Some(certificate.clone()),
                client_key_data: Some(key.clone()),
                ..Default::default()
            },
        };

        Self {
            api_version: "v1".to_string(),
            kind: "Config".to_string(),
            current_context: cluster.cluster_id.clone(),
            contexts: vec![ContextItem {
                name: cluster.cluster_id.clone(),
                context: ContextEntry {
                    cluster: cluster.cluster_id.clone(),
                    user: user_name.clone(),
                },
            }],
            clusters: vec![ClusterItem {
                name: cluster.cluster_id.clone(),
                cluster: ClusterEntry {
                    certificate_authority_data: cluster.ca_certificate.clone(),
                    server: format!("https://{}", cluster.endpoint),
                },
            }],
            users: vec![UserItem {
                name: user_name,
                user,
            }],
        }
    }

    pub fn to_yaml(&self) -> RelayResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| RelayError::ConnectionConfig(format!("serialize: {}", e)))
    }
}

/// A connection-config document written to disk for the lifetime of one
/// relayed command. Deleted on drop.
pub struct ScopedConnectionFile {
    file: NamedTempFile,
}

impl ScopedConnectionFile {
    /// Write the document to a uniquely named temp file
    pub fn materialize(config: &ConnectionConfig) -> RelayResult<Self> {
        let yaml = config.to_yaml()?;
        let file = tempfile::Builder::new()
            .prefix("gantry-conn-")
            .suffix(".yaml")
            .tempfile()
            .map_err(|e| RelayError::ConnectionConfig(format!("create temp file: {}", e)))?;
        std::fs::write(file.path(), yaml)
            .map_err(|e| RelayError::ConnectionConfig(format!("write temp file: {}", e)))?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
