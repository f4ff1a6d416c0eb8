use async_trait::async_trait;

use crate::common::SessionCredentials;
use crate::error::ChainResult;

pub mod aws;

pub use aws::{StsChainClient, StsClientFactory};

/// Capability surface a chain step needs from an identity-service client.
///
/// The chains depend only on this trait, never on a concrete SDK type, so the
/// sequencing logic can be exercised against fakes.
#[async_trait]
pub trait ChainClient: Send + Sync + std::fmt::Debug {
    /// Resolves the ARN of the identity backing this client.
    async fn caller_identity_arn(&self) -> ChainResult<String>;

    /// Exchanges the current credentials plus a target role reference for
    /// temporary credentials of that role, tagged with `session_name`.
    async fn assume_role(
        &self,
        role_arn: &str,
        session_name: &str,
    ) -> ChainResult<SessionCredentials>;
}

/// Builds a fresh [`ChainClient`] from temporary credentials.
///
/// Every chain step constructs a brand-new client value rather than mutating
/// the one it was handed.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    async fn from_session(
        &self,
        credentials: &SessionCredentials,
        region: &str,
    ) -> ChainResult<Box<dyn ChainClient>>;
}
