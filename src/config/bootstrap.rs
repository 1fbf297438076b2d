use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where boot-time seeding reads host-level configuration from.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct BootstrapConfig {
    /// OCI CLI config file. Falls back to `OCI_CLI_CONFIG_FILE`, then `~/.oci/config`.
    /// TOML: `bootstrap.oci_config_file`. Default: unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oci_config_file: Option<PathBuf>,
}
