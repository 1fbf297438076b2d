use crate::SensitiveFields;
use serde::{Deserialize, Serialize};

/// Connection settings for one database, keyed by `alias`.
///
/// The live connection pool belongs to an external collaborator; only its
/// `usable` verdict is mirrored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub alias: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dsn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_dir: Option<String>,

    /// Seconds.
    #[serde(default = "default_tcp_connect_timeout")]
    pub tcp_connect_timeout: u32,

    #[serde(default)]
    pub usable: bool,
}

impl DatabaseConfig {
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            user: None,
            password: None,
            dsn: None,
            wallet_password: None,
            wallet_location: None,
            config_dir: None,
            tcp_connect_timeout: default_tcp_connect_timeout(),
            usable: false,
        }
    }
}

impl SensitiveFields for DatabaseConfig {
    const SENSITIVE_FIELDS: &'static [&'static str] = &["password", "wallet_password"];
}

fn default_tcp_connect_timeout() -> u32 {
    5
}
