use crate::registry::DatabaseRegistry;
use crate::utils::EnvLookup;
use castor_schema::DatabaseConfig;
use tracing::info;

pub const DEFAULT_DATABASE_ALIAS: &str = "DEFAULT";

/// The `DEFAULT` database, filled from `DB_*` / `TNS_ADMIN` when present.
pub fn default_databases(env: &impl EnvLookup) -> Vec<DatabaseConfig> {
    let mut db = DatabaseConfig::new(DEFAULT_DATABASE_ALIAS);
    db.user = env.non_empty("DB_USERNAME");
    db.password = env.non_empty("DB_PASSWORD");
    db.dsn = env.non_empty("DB_DSN");
    db.wallet_password = env.non_empty("DB_WALLET_PASSWORD");
    db.config_dir = env.non_empty("TNS_ADMIN");
    // A wallet, when used, lives next to tnsnames.ora.
    if db.wallet_password.is_some() {
        db.wallet_location = db.config_dir.clone();
    }
    vec![db]
}

pub fn load_default_databases(registry: &DatabaseRegistry, env: &impl EnvLookup) -> usize {
    let added = registry.seed_if_empty(default_databases(env));
    info!(added, total = registry.len(), "Default databases loaded");
    added
}
