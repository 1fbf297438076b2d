use crate::sensitive::{self, SensitiveFields};
use crate::{ClientSettings, DatabaseConfig, ModelConfig, OciProfileConfig, PromptConfig};
use serde::{Deserialize, Serialize};

/// Field holding live OCI profile state; re-derived from the host at boot
/// and therefore never persisted.
pub const VOLATILE_FIELD: &str = "oci_configs";

/// Path of the ambient client identifier inside a serialized snapshot.
pub const CLIENT_IDENTITY_PATH: &str = "client_settings.client";

/// One client's settings plus every registry's contents: the unit of
/// export, import, diff and persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullSnapshot {
    pub client_settings: ClientSettings,

    #[serde(default)]
    pub model_configs: Vec<ModelConfig>,

    #[serde(default)]
    pub oci_configs: Vec<OciProfileConfig>,

    #[serde(default)]
    pub database_configs: Vec<DatabaseConfig>,

    #[serde(default)]
    pub prompt_configs: Vec<PromptConfig>,
}

impl FullSnapshot {
    /// Union of the sensitive field names declared by every record a snapshot contains.
    pub fn sensitive_fields() -> Vec<&'static str> {
        sensitive::collect(&[
            ClientSettings::SENSITIVE_FIELDS,
            ModelConfig::SENSITIVE_FIELDS,
            OciProfileConfig::SENSITIVE_FIELDS,
            DatabaseConfig::SENSITIVE_FIELDS,
            PromptConfig::SENSITIVE_FIELDS,
        ])
    }
}
