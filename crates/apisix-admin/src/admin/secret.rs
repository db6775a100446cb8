// Secret-manager resources (`/apisix/admin/secrets/{manager}/...`).
//
// A secret's concrete shape cannot be inferred from its payload: the
// manager tag lives in the URL path, never in the body. Decoding is
// therefore two-step -- resolve the variant from the tag, then decode the
// envelope's value into it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// Secret manager backends supported by the Admin API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretManager {
    Vault,
    Aws,
    Gcp,
}

impl SecretManager {
    /// The tag used in resource paths (`secrets/{tag}/...`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vault => "vault",
            Self::Aws => "aws",
            Self::Gcp => "gcp",
        }
    }
}

impl fmt::Display for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecretManager {
    type Err = Error;

    /// Unknown tags fail here, before any request is built.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vault" => Ok(Self::Vault),
            "aws" => Ok(Self::Aws),
            "gcp" => Ok(Self::Gcp),
            other => Err(Error::UnsupportedSecretManager(other.to_owned())),
        }
    }
}

/// HashiCorp Vault connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct VaultSecret {
    pub uri: Option<String>,
    pub prefix: Option<String>,
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// AWS Secrets Manager connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AwsSecret {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
}

/// GCP Secret Manager connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GcpSecret {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_config: Option<GcpAuthConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_verify: Option<bool>,
}

/// Inline service-account credentials for [`GcpSecret`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GcpAuthConfig {
    pub client_email: Option<String>,
    pub private_key: Option<String>,
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// A secret-manager configuration, tagged by backend.
///
/// Serializes as the bare payload -- the tag is carried in the URL path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Secret {
    Vault(VaultSecret),
    Aws(AwsSecret),
    Gcp(GcpSecret),
}

impl Secret {
    /// The manager tag this variant belongs to.
    pub fn manager(&self) -> SecretManager {
        match self {
            Self::Vault(_) => SecretManager::Vault,
            Self::Aws(_) => SecretManager::Aws,
            Self::Gcp(_) => SecretManager::Gcp,
        }
    }

    /// Decode an envelope `value` into the variant selected by `manager`.
    pub fn from_value(manager: SecretManager, value: Value) -> Result<Self, serde_json::Error> {
        match manager {
            SecretManager::Vault => serde_json::from_value(value).map(Self::Vault),
            SecretManager::Aws => serde_json::from_value(value).map(Self::Aws),
            SecretManager::Gcp => serde_json::from_value(value).map(Self::Gcp),
        }
    }
}
