use tracing::info;

use crate::client::{ChainClient, ClientFactory};
use crate::common::{generate_role_arn, Arn, ChainConfig, SessionCredentials};
use crate::error::{ChainError, ChainResult};

/// Access role every SRE can assume inside their own account, the first hop
/// of the jump chain.
pub const SRE_CCS_ACCESS_ROLE: &str = "RH-SRE-CCS-Access";

/// Shared staging role in the jump account, the last hop inside the operator
/// account boundary.
pub const TECHNICAL_SUPPORT_ACCESS_ROLE: &str = "RH-Technical-Support-Access";

/// Well-known role created in every linked account of an organization.
pub const ORGANIZATION_ACCOUNT_ACCESS_ROLE: &str = "OrganizationAccountAccessRole";

/// Assumes `OrganizationAccountAccessRole` in a linked account and returns a
/// client authenticated as that role, targeted at `region`.
///
/// Only works when `client` is backed by an identity from the root account of
/// the organization owning `account_id`.
pub async fn assume_organization_account_access(
    client: &dyn ChainClient,
    factory: &dyn ClientFactory,
    account_id: &str,
    region: &str,
    session_name: &str,
    partition: &str,
) -> ChainResult<Box<dyn ChainClient>> {
    let credentials =
        generate_organization_account_access_credentials(client, account_id, session_name, partition)
            .await?;

    factory.from_session(&credentials, region).await
}

/// Assume-role half of the organization chain, returning the raw credentials.
pub async fn generate_organization_account_access_credentials(
    client: &dyn ChainClient,
    account_id: &str,
    session_name: &str,
    partition: &str,
) -> ChainResult<SessionCredentials> {
    let rendered = generate_role_arn(account_id, ORGANIZATION_ACCOUNT_ACCESS_ROLE);
    let mut target_role = Arn::parse(&rendered)?;

    // The locally built ARN always carries the default partition; the
    // partition of the chain step being executed wins.
    target_role.partition = partition.to_string();

    info!("assuming organization access role {}", target_role);
    client.assume_role(&target_role.to_string(), session_name).await
}

/// Walks the assume-role chain from the caller's own identity to the shared
/// jump role: own-account access role first, then the technical-support role
/// in the configured jump account.
///
/// Both hops stay inside the operator account boundary, so every failure here
/// is wrapped as [`ChainError::InternalChain`] and points at IAM setup or
/// missing configuration rather than a customer-side problem.
pub async fn assume_jump_role(
    client: &dyn ChainClient,
    factory: &dyn ClientFactory,
    config: &ChainConfig,
    region: &str,
    session_name: &str,
) -> ChainResult<SessionCredentials> {
    run_jump_chain(client, factory, config, region, session_name)
        .await
        .map_err(ChainError::internal)
}

async fn run_jump_chain(
    client: &dyn ChainClient,
    factory: &dyn ClientFactory,
    config: &ChainConfig,
    region: &str,
    session_name: &str,
) -> ChainResult<SessionCredentials> {
    let caller_arn = client.caller_identity_arn().await?;
    let caller = Arn::parse(&caller_arn)?;

    let access_role = generate_role_arn(&caller.account_id, SRE_CCS_ACCESS_ROLE);
    info!("assuming in-account access role {}", access_role);
    let access_credentials = client.assume_role(&access_role, session_name).await?;

    let access_client = factory.from_session(&access_credentials, region).await?;

    let jump_role = generate_role_arn(&config.jump_account_id, TECHNICAL_SUPPORT_ACCESS_ROLE);
    info!("assuming jump role {}", jump_role);
    access_client.assume_role(&jump_role, session_name).await
}

/// Extends the jump chain with one final hop into `target_role`, typically a
/// per-cluster support role in the customer account.
///
/// A rejection on the final hop surfaces as [`ChainError::TargetRole`] so
/// operators can tell customer-side permission problems apart from internal
/// misconfiguration.
pub async fn assume_support_role(
    client: &dyn ChainClient,
    factory: &dyn ClientFactory,
    config: &ChainConfig,
    region: &str,
    session_name: &str,
    target_role: &str,
) -> ChainResult<SessionCredentials> {
    let jump_credentials = assume_jump_role(client, factory, config, region, session_name).await?;

    let jump_client = factory
        .from_session(&jump_credentials, region)
        .await
        .map_err(ChainError::internal)?;

    info!("assuming target role {}", target_role);
    jump_client
        .assume_role(target_role, session_name)
        .await
        .map_err(|source| ChainError::target_role(target_role, source))
}

/// Derives the audit session name from the caller's own identity.
///
/// The identity resource looks like `user/jdoe` or
/// `assumed-role/SomeRole/jdoe`; the principal is the final path segment and
/// the result is `RH-SRE-jdoe`. A resource with fewer than two segments has
/// no principal and is an explicit error.
pub async fn derive_session_name(client: &dyn ChainClient) -> ChainResult<String> {
    let caller_arn = client.caller_identity_arn().await?;
    let caller = Arn::parse(&caller_arn)?;

    let segments: Vec<&str> = caller.resource.split('/').collect();
    if segments.len() < 2 {
        return Err(ChainError::session_name(&caller.resource));
    }

    let principal = segments[segments.len() - 1];
    Ok(format!("RH-SRE-{}", principal))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;

    /// Fake identity-service client doubling as its own factory. Every client
    /// built mid-chain shares the same call log, so tests can assert on the
    /// exact assume-role sequence.
    #[derive(Clone, Debug)]
    struct FakeChain {
        identity: String,
        calls: Arc<Mutex<Vec<String>>>,
        rejected_roles: Arc<HashSet<String>>,
    }

    impl FakeChain {
        fn new(identity: &str) -> Self {
            Self {
                identity: identity.to_string(),
                calls: Arc::new(Mutex::new(Vec::new())),
                rejected_roles: Arc::new(HashSet::new()),
            }
        }

        fn rejecting(identity: &str, roles: &[&str]) -> Self {
            Self {
                rejected_roles: Arc::new(roles.iter().map(|r| r.to_string()).collect()),
                ..Self::new(identity)
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChainClient for FakeChain {
        async fn caller_identity_arn(&self) -> ChainResult<String> {
            Ok(self.identity.clone())
        }

        async fn assume_role(
            &self,
            role_arn: &str,
            _session_name: &str,
        ) -> ChainResult<SessionCredentials> {
            self.calls.lock().unwrap().push(role_arn.to_string());

            if self.rejected_roles.contains(role_arn) {
                return Err(ChainError::assume_role(role_arn, "access denied"));
            }

            Ok(SessionCredentials {
                access_key_id: format!("key-for-{}", role_arn),
                secret_access_key: "secret".to_string(),
                session_token: "token".to_string(),
                expiration: None,
            })
        }
    }

    #[async_trait]
    impl ClientFactory for FakeChain {
        async fn from_session(
            &self,
            _credentials: &SessionCredentials,
            _region: &str,
        ) -> ChainResult<Box<dyn ChainClient>> {
            Ok(Box::new(self.clone()))
        }
    }

    const CALLER: &str = "arn:aws:iam::111122223333:user/jdoe";

    fn config() -> ChainConfig {
        ChainConfig::new("444455556666")
    }

    #[tokio::test]
    async fn jump_chain_assumes_own_account_role_then_jump_role() {
        let fake = FakeChain::new(CALLER);

        let credentials =
            assume_jump_role(&fake, &fake, &config(), "us-east-1", "RH-SRE-jdoe")
                .await
                .unwrap();

        assert_eq!(
            fake.calls(),
            vec![
                "arn:aws:iam::111122223333:role/RH-SRE-CCS-Access".to_string(),
                "arn:aws:iam::444455556666:role/RH-Technical-Support-Access".to_string(),
            ]
        );
        assert_eq!(
            credentials.access_key_id,
            "key-for-arn:aws:iam::444455556666:role/RH-Technical-Support-Access"
        );
    }

    #[tokio::test]
    async fn jump_chain_stops_after_the_first_rejection() {
        let fake = FakeChain::rejecting(
            CALLER,
            &["arn:aws:iam::111122223333:role/RH-SRE-CCS-Access"],
        );

        let err = assume_jump_role(&fake, &fake, &config(), "us-east-1", "RH-SRE-jdoe")
            .await
            .unwrap_err();

        assert_eq!(fake.calls().len(), 1);
        assert!(matches!(err, ChainError::InternalChain { .. }));
    }

    #[tokio::test]
    async fn jump_chain_reports_a_bad_identity_arn_as_internal() {
        let fake = FakeChain::new("not-an-arn");

        let err = assume_jump_role(&fake, &fake, &config(), "us-east-1", "RH-SRE-jdoe")
            .await
            .unwrap_err();

        assert!(fake.calls().is_empty());
        assert!(matches!(err, ChainError::InternalChain { .. }));
    }

    const TARGET_ROLE: &str = "arn:aws:iam::999988887777:role/ManagedOpenShift-Support-abc123";

    #[tokio::test]
    async fn support_chain_issues_exactly_three_calls_in_order() {
        let fake = FakeChain::new(CALLER);

        let credentials = assume_support_role(
            &fake,
            &fake,
            &config(),
            "us-east-1",
            "RH-SRE-jdoe",
            TARGET_ROLE,
        )
        .await
        .unwrap();

        assert_eq!(
            fake.calls(),
            vec![
                "arn:aws:iam::111122223333:role/RH-SRE-CCS-Access".to_string(),
                "arn:aws:iam::444455556666:role/RH-Technical-Support-Access".to_string(),
                TARGET_ROLE.to_string(),
            ]
        );
        assert_eq!(credentials.access_key_id, format!("key-for-{}", TARGET_ROLE));
    }

    #[tokio::test]
    async fn support_chain_failure_on_second_hop_prevents_the_target_call() {
        let fake = FakeChain::rejecting(
            CALLER,
            &["arn:aws:iam::444455556666:role/RH-Technical-Support-Access"],
        );

        let err = assume_support_role(
            &fake,
            &fake,
            &config(),
            "us-east-1",
            "RH-SRE-jdoe",
            TARGET_ROLE,
        )
        .await
        .unwrap_err();

        assert_eq!(fake.calls().len(), 2);
        assert!(matches!(err, ChainError::InternalChain { .. }));
    }

    #[tokio::test]
    async fn support_chain_identifies_a_target_rejection_as_customer_side() {
        let fake = FakeChain::rejecting(CALLER, &[TARGET_ROLE]);

        let err = assume_support_role(
            &fake,
            &fake,
            &config(),
            "us-east-1",
            "RH-SRE-jdoe",
            TARGET_ROLE,
        )
        .await
        .unwrap_err();

        assert_eq!(fake.calls().len(), 3);
        match err {
            ChainError::TargetRole { role_arn, .. } => assert_eq!(role_arn, TARGET_ROLE),
            other => panic!("expected TargetRole error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn organization_chain_rewrites_the_partition_before_assuming() {
        let fake = FakeChain::new(CALLER);

        assume_organization_account_access(
            &fake,
            &fake,
            "123456789012",
            "us-gov-west-1",
            "RH-SRE-jdoe",
            "aws-us-gov",
        )
        .await
        .unwrap();

        assert_eq!(
            fake.calls(),
            vec!["arn:aws-us-gov:iam::123456789012:role/OrganizationAccountAccessRole".to_string()]
        );
    }

    #[tokio::test]
    async fn session_name_comes_from_the_principal_segment() {
        let fake = FakeChain::new("arn:aws:sts::111122223333:assumed-role/SomeRole/jdoe");
        assert_eq!(derive_session_name(&fake).await.unwrap(), "RH-SRE-jdoe");

        let fake = FakeChain::new("arn:aws:iam::111122223333:user/jdoe");
        assert_eq!(derive_session_name(&fake).await.unwrap(), "RH-SRE-jdoe");
    }

    #[tokio::test]
    async fn session_name_rejects_a_resource_without_a_principal() {
        let fake = FakeChain::new("arn:aws:iam::111122223333:root");

        let err = derive_session_name(&fake).await.unwrap_err();
        assert!(matches!(err, ChainError::SessionName { .. }));
    }
}
