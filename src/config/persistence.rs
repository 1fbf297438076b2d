use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings snapshot store.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PersistenceConfig {
    /// When false the gateway starts unusable and every save/load is a logged no-op.
    /// TOML: `persistence.enabled`. Default: `true`.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Database URL for SQLite.
    /// TOML: `persistence.database_url`. Default: `sqlite://castor.db`.
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Upper bound of pooled connections.
    /// TOML: `persistence.max_connections`. Default: `5`.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Seconds a caller may wait for a pooled connection.
    /// TOML: `persistence.acquire_timeout_secs`. Default: `5`.
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

impl PersistenceConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs.max(1))
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            database_url: default_database_url(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_database_url() -> String {
    "sqlite://castor.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    5
}
