pub mod arn;
pub mod config;
pub mod types;

// Re-export everything for easy access
pub use arn::{generate_role_arn, Arn};
pub use config::{ChainConfig, JUMPROLE_ACCOUNT_ID_VAR};
pub use types::{ClusterCredentialsResponse, SessionCredentials, VendedCredentials};
