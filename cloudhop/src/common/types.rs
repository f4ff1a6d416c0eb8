use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Temporary credentials produced by a successful assume-role call.
///
/// A capability token: whoever holds these values can authenticate as the
/// assumed role until `expiration`. Held in memory only for the duration of a
/// chain run, never persisted.
#[derive(Clone)]
pub struct SessionCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: Option<DateTime<Utc>>,
}

// Manual Debug so secret material never lands in logs
impl fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &"** redacted **")
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// Response envelope returned by the cluster credentials endpoint.
///
/// The `credentials` field is a JSON-encoded string that decodes into
/// [`VendedCredentials`] in a second stage. The double encoding is the
/// gateway's wire contract, not a choice made here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterCredentialsResponse {
    #[serde(rename = "clusterID")]
    pub cluster_id: String,

    /// Link to the cloud console, optional
    #[serde(rename = "consoleLink", skip_serializing_if = "Option::is_none")]
    pub console_link: Option<String>,

    /// JSON-encoded credential fields, optional
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,

    /// Region, optional
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Credential fields vended by the gateway, embedded as JSON text inside the
/// outer envelope. Field names follow the wire contract exactly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VendedCredentials {
    #[serde(rename = "AccessKeyId")]
    pub access_key_id: String,

    #[serde(rename = "SecretAccessKey")]
    pub secret_access_key: String,

    #[serde(rename = "SessionToken")]
    pub session_token: String,

    #[serde(rename = "Region")]
    pub region: String,

    #[serde(rename = "Expiration")]
    pub expiration: String,
}

impl VendedCredentials {
    /// Converts vended fields into chain credentials. The gateway does not
    /// promise an expiration format, so an unparseable timestamp is dropped
    /// rather than failed.
    pub fn into_session(self) -> SessionCredentials {
        let expiration = DateTime::parse_from_rfc3339(&self.expiration)
            .ok()
            .map(|t| t.with_timezone(&Utc));

        SessionCredentials {
            access_key_id: self.access_key_id,
            secret_access_key: self.secret_access_key,
            session_token: self.session_token,
            expiration,
        }
    }
}
