use std::time::SystemTime;

use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_sts::error::DisplayErrorContext;
use aws_sdk_sts::Client as StsClient;
use chrono::{DateTime, Utc};
use tracing::debug;

use super::{ChainClient, ClientFactory};
use crate::common::SessionCredentials;
use crate::error::{ChainError, ChainResult};

/// STS-backed implementation of the chain client capability.
#[derive(Debug)]
pub struct StsChainClient {
    sts: StsClient,
}

impl StsChainClient {
    pub fn new(sts: StsClient) -> Self {
        Self { sts }
    }

    /// Builds a client from the ambient credential chain, falling back to
    /// us-east-1 when no region is configured.
    pub async fn from_env() -> Self {
        let region_provider = RegionProviderChain::default_provider().or_else("us-east-1");
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await;

        Self::new(StsClient::new(&config))
    }
}

#[async_trait]
impl ChainClient for StsChainClient {
    async fn caller_identity_arn(&self) -> ChainResult<String> {
        let identity = self
            .sts
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| ChainError::caller_identity(DisplayErrorContext(e).to_string()))?;

        identity
            .arn()
            .map(str::to_string)
            .ok_or_else(|| ChainError::caller_identity("response carried no ARN"))
    }

    async fn assume_role(
        &self,
        role_arn: &str,
        session_name: &str,
    ) -> ChainResult<SessionCredentials> {
        debug!("assuming role {}", role_arn);

        let output = self
            .sts
            .assume_role()
            .role_arn(role_arn)
            .role_session_name(session_name)
            .send()
            .await
            .map_err(|e| ChainError::assume_role(role_arn, DisplayErrorContext(e).to_string()))?;

        let credentials = output
            .credentials()
            .ok_or_else(|| ChainError::assume_role(role_arn, "response carried no credentials"))?;

        Ok(SessionCredentials {
            access_key_id: credentials.access_key_id().to_string(),
            secret_access_key: credentials.secret_access_key().to_string(),
            session_token: credentials.session_token().to_string(),
            expiration: DateTime::<Utc>::from_timestamp(
                credentials.expiration().secs(),
                credentials.expiration().subsec_nanos(),
            ),
        })
    }
}

/// Builds STS-backed clients from assumed-role credentials.
#[derive(Debug, Clone, Default)]
pub struct StsClientFactory;

#[async_trait]
impl ClientFactory for StsClientFactory {
    async fn from_session(
        &self,
        credentials: &SessionCredentials,
        region: &str,
    ) -> ChainResult<Box<dyn ChainClient>> {
        let provider = Credentials::new(
            credentials.access_key_id.clone(),
            credentials.secret_access_key.clone(),
            Some(credentials.session_token.clone()),
            credentials.expiration.map(SystemTime::from),
            "cloudhop",
        );

        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(provider)
            .load()
            .await;

        Ok(Box::new(StsChainClient::new(StsClient::new(&config))))
    }
}
