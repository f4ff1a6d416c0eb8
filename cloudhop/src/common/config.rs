use std::env;

use serde::{Deserialize, Serialize};

use crate::error::{ChainError, ChainResult};

/// Environment variable naming the jump account. The value differs between
/// staging and production deployments.
pub const JUMPROLE_ACCOUNT_ID_VAR: &str = "JUMPROLE_ACCOUNT_ID";

/// Configuration injected into the jump-role chain.
///
/// The chain never reads ambient process state itself; callers load this
/// fresh per invocation, typically with [`ChainConfig::from_env`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Account hosting the shared technical-support jump role
    pub jump_account_id: String,
}

impl ChainConfig {
    pub fn new(jump_account_id: impl Into<String>) -> Self {
        Self {
            jump_account_id: jump_account_id.into(),
        }
    }

    /// Reads the jump account id from the process environment.
    pub fn from_env() -> ChainResult<Self> {
        match env::var(JUMPROLE_ACCOUNT_ID_VAR) {
            Ok(id) if !id.is_empty() => Ok(Self::new(id)),
            _ => Err(ChainError::JumpAccountUnset {
                variable: JUMPROLE_ACCOUNT_ID_VAR,
            }),
        }
    }
}
