//! Caller credential boundary
//!
//! Mapping a caller identity to a provider credential is the job of an
//! external identity service; gantry only sees this trait.

use async_trait::async_trait;
use gantry_common::ProviderCredential;
use std::collections::HashMap;

use crate::error::{RelayError, RelayResult};

/// Resolves a caller identity to their provider credential
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn credential_for(&self, caller_id: &str) -> RelayResult<ProviderCredential>;
}

/// In-memory credential store. Mostly useful for testing.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialStore {
    credentials: HashMap<String, ProviderCredential>,
}

impl StaticCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(
        mut self,
        caller_id: impl Into<String>,
        credential: ProviderCredential,
    ) -> Self {
        self.credentials.insert(caller_id.into(), credential);
        self
    }
}

#[async_trait]
impl CredentialStore for StaticCredentialStore {
    async fn credential_for(&self, caller_id: &str) -> RelayResult<ProviderCredential> {
        self.credentials
            .get(caller_id)
            .cloned()
            .ok_or_else(|| RelayError::CredentialNotFound(caller_id.to_string()))
    }
}

/// Single service-account deployment: every caller resolves to the same
/// provider credential
#[derive(Debug, Clone)]
pub struct ServiceAccountCredentialStore {
    credential: ProviderCredential,
}

impl ServiceAccountCredentialStore {
    pub fn new(credential: ProviderCredential) -> Self {
        Self { credential }
    }
}

#[async_trait]
impl CredentialStore for ServiceAccountCredentialStore {
    async fn credential_for(&self, _caller_id: &str) -> RelayResult<ProviderCredential> {
        Ok(self.credential.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_store_lookup() {
        let store = StaticCredentialStore::new()
            .with_credential("user-1", ProviderCredential::bearer("tok-1"));

        let cred = store.credential_for("user-1").await.unwrap();
        assert_eq!(cred.access_token, "tok-1");

        let err = store.credential_for("user-2").await.unwrap_err();
        assert!(matches!(err, RelayError::CredentialNotFound(_)));
    }
}
