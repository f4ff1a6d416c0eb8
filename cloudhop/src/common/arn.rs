use std::fmt;

use crate::error::{ChainError, ChainResult};

/// Renders the canonical role ARN for an account and role name.
///
/// Pure string formatting; inputs are not validated, the identity service
/// rejects bad identifiers downstream. The rendered partition is always
/// `aws`, chain steps targeting another partition rewrite it after parsing.
pub fn generate_role_arn(account_id: &str, role_name: &str) -> String {
    format!("arn:aws:iam::{}:role/{}", account_id, role_name)
}

/// Structured `arn:partition:service:region:account:resource` identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arn {
    pub partition: String,
    pub service: String,
    pub region: String,
    pub account_id: String,
    pub resource: String,
}

impl Arn {
    /// Splits a rendered ARN into its six sections. The resource section may
    /// itself contain `:` or `/`, so the split is capped at six fields.
    pub fn parse(input: &str) -> ChainResult<Self> {
        let mut sections = input.splitn(6, ':');

        if sections.next() != Some("arn") {
            return Err(ChainError::malformed_arn(input, "missing arn: prefix"));
        }

        match (
            sections.next(),
            sections.next(),
            sections.next(),
            sections.next(),
            sections.next(),
        ) {
            (Some(partition), Some(service), Some(region), Some(account_id), Some(resource)) => {
                Ok(Self {
                    partition: partition.to_string(),
                    service: service.to_string(),
                    region: region.to_string(),
                    account_id: account_id.to_string(),
                    resource: resource.to_string(),
                })
            }
            _ => Err(ChainError::malformed_arn(
                input,
                "expected six colon-separated sections",
            )),
        }
    }
}

impl fmt::Display for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}:{}",
            self.partition, self.service, self.region, self.account_id, self.resource
        )
    }
}
