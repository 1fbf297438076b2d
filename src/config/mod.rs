mod basic;
mod bootstrap;
mod persistence;

pub use basic::BasicConfig;
pub use bootstrap::BootstrapConfig;
pub use persistence::PersistenceConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, sync::LazyLock};

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core process configuration (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Settings snapshot store (see `persistence` table in config.toml).
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Boot-time seeding sources (see `bootstrap` table in config.toml).
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "CASTOR_";

impl Config {
    /// Builds a Figment that merges defaults, a config TOML file and `CASTOR_*` env vars.
    ///
    /// Nested keys use `__`, e.g. `CASTOR_PERSISTENCE__DATABASE_URL`.
    pub fn figment() -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment = figment.merge(Toml::file(DEFAULT_CONFIG_FILE));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads configuration from defaults, optional `config.toml` and the environment.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    fn load_or_panic() -> Self {
        Self::load().unwrap_or_else(|err| {
            panic!("failed to extract configuration (defaults + optional config.toml + env): {err}")
        })
    }
}

/// Global, lazily-initialized configuration instance for the binary.
pub static CONFIG: LazyLock<Config> = LazyLock::new(Config::load_or_panic);
