//! Cluster discovery: the provider listing boundary and the concurrent
//! fan-out enumerator built on top of it.

pub mod client;
pub mod enumerator;

pub use client::{CloudListingClient, ListingClientFactory, StaticClientFactory, StaticListingClient};
pub use enumerator::{BranchFailure, Enumeration, ResourceEnumerator};
