use crate::SensitiveFields;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How an OCI profile authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OciAuthentication {
    #[default]
    ApiKey,
    SecurityToken,
    InstancePrincipal,
    OkeWorkloadIdentity,
}

impl OciAuthentication {
    /// Parses the values accepted by `OCI_CLI_AUTH`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "api_key" => Some(Self::ApiKey),
            "security_token" => Some(Self::SecurityToken),
            "instance_principal" => Some(Self::InstancePrincipal),
            "oke_workload_identity" => Some(Self::OkeWorkloadIdentity),
            _ => None,
        }
    }
}

impl fmt::Display for OciAuthentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OciAuthentication::ApiKey => "api_key",
            OciAuthentication::SecurityToken => "security_token",
            OciAuthentication::InstancePrincipal => "instance_principal",
            OciAuthentication::OkeWorkloadIdentity => "oke_workload_identity",
        };
        f.write_str(s)
    }
}

/// One OCI CLI profile.
///
/// Which credential fields matter depends on `authentication`. `usable` is
/// owned by an external connectivity probe and is never computed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OciProfileConfig {
    pub auth_profile: String,

    #[serde(default)]
    pub authentication: OciAuthentication,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenancy: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_file: Option<String>,

    /// Inline PEM private key, used instead of `key_file`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass_phrase: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_token_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genai_compartment_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genai_region: Option<String>,

    #[serde(default)]
    pub usable: bool,
}

impl OciProfileConfig {
    pub fn blank(auth_profile: impl Into<String>) -> Self {
        Self {
            auth_profile: auth_profile.into(),
            authentication: OciAuthentication::default(),
            user: None,
            fingerprint: None,
            tenancy: None,
            region: None,
            key_file: None,
            key_content: None,
            pass_phrase: None,
            security_token_file: None,
            genai_compartment_id: None,
            genai_region: None,
            usable: false,
        }
    }
}

impl SensitiveFields for OciProfileConfig {
    const SENSITIVE_FIELDS: &'static [&'static str] = &["key_content", "pass_phrase"];
}
