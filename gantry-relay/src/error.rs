//! Relay error taxonomy
//!
//! One enum for everything the core surfaces to its transport wrapper. The
//! wrapper (see `http`) is responsible for translating these kinds into
//! protocol status codes; here they stay plain values with enough context
//! (cluster identifiers, version strings) for that translation.

use thiserror::Error;

/// Errors surfaced by discovery and command relay
#[derive(Debug, Error)]
pub enum RelayError {
    /// Target account/zone/cluster absent; terminal, surfaced verbatim
    #[error("Cluster not found: {cluster_id} in {account}/{zone}")]
    ClusterNotFound {
        account: String,
        zone: String,
        cluster_id: String,
    },

    /// Caller has no resolvable provider credential
    #[error("No provider credential for caller: {0}")]
    CredentialNotFound(String),

    /// A remote listing call failed (credential/transport failure); not
    /// retried by this core
    #[error("Provider API error: {0}")]
    Provider(String),

    /// The whole enumeration produced nothing and more than one branch
    /// failed
    #[error("Enumeration failed: no results and {failures} branches failed")]
    Enumeration { failures: usize },

    /// The operation was cancelled before completing
    #[error("Operation cancelled")]
    Cancelled,

    /// Malformed request
    #[error("Validation error: {0}")]
    Validation(String),

    /// The tool inventory could not be read at startup
    #[error("Tool inventory error: {0}")]
    Inventory(String),

    /// Connection-config materialization failed
    #[error("Connection config error: {0}")]
    ConnectionConfig(String),

    /// The tool process exited non-zero; captured output is preserved
    #[error("Command failed with exit code {exit_code}")]
    CommandFailed { exit_code: i32, output: String },

    /// The runner itself failed before an exit status was available
    #[error("Runner error: {0}")]
    Runner(String),

    /// Internal system error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<gantry_common::Error> for RelayError {
    fn from(err: gantry_common::Error) -> Self {
        match err {
            gantry_common::Error::ClusterNotFound(id) => RelayError::Internal(format!(
                "cluster not found without target context: {}",
                id
            )),
            gantry_common::Error::AccountNotFound(id) => {
                RelayError::Provider(format!("account not found: {}", id))
            }
            gantry_common::Error::Validation(msg) => RelayError::Validation(msg),
            gantry_common::Error::System(msg) => RelayError::Internal(msg),
            gantry_common::Error::Io(e) => RelayError::Internal(format!("I/O error: {}", e)),
        }
    }
}

impl From<std::io::Error> for RelayError {
    fn from(err: std::io::Error) -> Self {
        RelayError::Internal(format!("I/O error: {}", err))
    }
}

/// Result type alias for relay operations
pub type RelayResult<T> = std::result::Result<T, RelayError>;
