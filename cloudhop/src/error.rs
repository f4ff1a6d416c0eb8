use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while chaining credentials
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("failed to resolve caller identity: {message}")]
    CallerIdentity { message: String },

    #[error("malformed ARN {arn:?}: {message}")]
    MalformedArn { arn: String, message: String },

    #[error("assume-role rejected for {role_arn}: {message}")]
    AssumeRole { role_arn: String, message: String },

    #[error("jump account is not configured: set {variable}")]
    JumpAccountUnset { variable: &'static str },

    #[error("identity resource {resource:?} carries no principal segment")]
    SessionName { resource: String },

    #[error("failed to build a client from session credentials: {message}")]
    ClientBuild { message: String },

    #[error(
        "jump-role chain failed inside the operator account boundary, \
         check IAM setup and JUMPROLE_ACCOUNT_ID: {source}"
    )]
    InternalChain {
        #[source]
        source: Box<ChainError>,
    },

    #[error(
        "target role {role_arn} could not be assumed, \
         likely a customer-side permission or missing role: {source}"
    )]
    TargetRole {
        role_arn: String,
        #[source]
        source: Box<ChainError>,
    },

    #[error("gateway session error: {source}")]
    Gateway {
        #[source]
        source: anyhow::Error,
    },

    #[error("gateway request did not complete within {timeout:?}")]
    GatewayTimeout { timeout: Duration },

    #[error("gateway request failed: {source}")]
    Transport {
        #[from]
        source: hyper::Error,
    },

    #[error("unable to decode the cloud credentials envelope: {source}")]
    EnvelopeDecode {
        #[source]
        source: serde_json::Error,
    },

    #[error("unable to decode the vended credential fields: {source}")]
    CredentialsDecode {
        #[source]
        source: serde_json::Error,
    },
}

impl ChainError {
    pub fn caller_identity(message: impl Into<String>) -> Self {
        Self::CallerIdentity {
            message: message.into(),
        }
    }

    pub fn malformed_arn(arn: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedArn {
            arn: arn.into(),
            message: message.into(),
        }
    }

    pub fn assume_role(role_arn: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AssumeRole {
            role_arn: role_arn.into(),
            message: message.into(),
        }
    }

    pub fn session_name(resource: impl Into<String>) -> Self {
        Self::SessionName {
            resource: resource.into(),
        }
    }

    pub fn client_build(message: impl Into<String>) -> Self {
        Self::ClientBuild {
            message: message.into(),
        }
    }

    pub fn internal(source: ChainError) -> Self {
        Self::InternalChain {
            source: Box::new(source),
        }
    }

    pub fn target_role(role_arn: impl Into<String>, source: ChainError) -> Self {
        Self::TargetRole {
            role_arn: role_arn.into(),
            source: Box::new(source),
        }
    }

    pub fn gateway(source: anyhow::Error) -> Self {
        Self::Gateway { source }
    }
}

pub type ChainResult<T> = Result<T, ChainError>;
