//! Credential-chaining helpers for SRE access into customer cloud accounts.
//!
//! Two independent paths produce short-lived credentials:
//!
//! - the assume-role chains in [`chain`], which hop from the operator's own
//!   identity through the shared jump account and optionally into a cluster's
//!   support role, and
//! - the [`gateway`] fetcher, which retrieves pre-vended cluster credentials
//!   from the internal API gateway.
//!
//! All chain logic is written against the [`client::ChainClient`] and
//! [`client::ClientFactory`] capability traits so it can be exercised without
//! a live identity service. This crate deliberately has no command-line
//! surface; it is consumed by the surrounding tooling.

pub mod chain;
pub mod client;
pub mod common;
pub mod error;
pub mod gateway;

pub use client::{ChainClient, ClientFactory, StsChainClient, StsClientFactory};
pub use common::{generate_role_arn, Arn, ChainConfig, SessionCredentials};
pub use error::{ChainError, ChainResult};
pub use gateway::{ClusterCredentialsFetcher, GatewaySession};
