//! Gantry relay library
//!
//! Cluster discovery and version-compatible command relay: enumerate cloud
//! accounts/zones/clusters through a provider API with concurrent fan-out,
//! resolve a compatible admin-tool version per cluster with a prefix trie,
//! and relay commands to be executed against a cluster out-of-process.

// Core modules
pub mod config;
pub mod error;

// Version matching
pub mod trie;

// Cluster discovery
pub mod discovery;

// Command relay
pub mod relay;

// Cooperative cancellation
pub mod cancel;

// Transport wrapper
pub mod http;

// Logging configuration
pub mod logging;
