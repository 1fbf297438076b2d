//! Process-wide state: every registry, the client settings store and the
//! persistence gateway, plus the boot sequence that fills them.

use crate::config::{BootstrapConfig, Config};
use crate::db::PersistenceGateway;
use crate::defaults::{
    load_default_databases, load_default_models, load_default_prompts, load_host_oci_profiles,
};
use crate::error::CastorError;
use crate::overrides::EnvOverrideApplier;
use crate::reconcile::DefaultReconciler;
use crate::registry::{DatabaseRegistry, ModelRegistry, OciRegistry, PromptRegistry, RegistryEntry};
use crate::settings::ClientSettingsStore;
use crate::utils::EnvLookup;
use castor_schema::{DEFAULT_CLIENT, FullSnapshot, SERVER_CLIENT};
use tracing::{info, warn};

/// Shared handles to all configuration state. Clones are cheap and observe
/// the same registries.
#[derive(Clone)]
pub struct AppContext {
    pub models: ModelRegistry,
    pub oci: OciRegistry,
    pub databases: DatabaseRegistry,
    pub prompts: PromptRegistry,
    pub settings: ClientSettingsStore,
    pub gateway: PersistenceGateway,
    overrides: EnvOverrideApplier,
    reconciler: DefaultReconciler,
}

impl AppContext {
    /// Empty registries and the reserved clients only; nothing seeded.
    pub fn new(gateway: PersistenceGateway) -> Self {
        Self {
            models: ModelRegistry::new(),
            oci: OciRegistry::new(),
            databases: DatabaseRegistry::new(),
            prompts: PromptRegistry::new(),
            settings: ClientSettingsStore::new(),
            gateway,
            overrides: EnvOverrideApplier::default(),
            reconciler: DefaultReconciler::default(),
        }
    }

    /// Connects the persistence store described by `cfg` and runs [`Self::bootstrap`].
    pub async fn boot(cfg: &Config, env: &impl EnvLookup) -> Self {
        let gateway = PersistenceGateway::connect(&cfg.persistence).await;
        Self::bootstrap(gateway, &cfg.bootstrap, env).await
    }

    /// Boot sequence:
    /// 1. seed defaults and derive OCI profiles from the host;
    /// 2. apply env overrides;
    /// 3. merge the persisted snapshot, if any;
    /// 4. apply env overrides again so deployment secrets beat stale persisted ones;
    /// 5. reconcile prompts against the shipped defaults.
    pub async fn bootstrap(
        gateway: PersistenceGateway,
        bootstrap: &BootstrapConfig,
        env: &impl EnvLookup,
    ) -> Self {
        let ctx = Self::new(gateway);

        load_default_models(&ctx.models);
        load_default_databases(&ctx.databases, env);
        load_default_prompts(&ctx.prompts);
        load_host_oci_profiles(&ctx.oci, bootstrap, env);

        ctx.apply_env_overrides(env);

        if let Some(snapshot) = ctx.gateway.load().await {
            if let Err(e) = ctx.merge_snapshot(snapshot) {
                warn!(error = %e, "Discarding persisted snapshot");
            }
            ctx.apply_env_overrides(env);
        }

        ctx.reconciler.reconcile(&ctx.prompts);

        info!(
            models = ctx.models.len(),
            oci_profiles = ctx.oci.len(),
            databases = ctx.databases.len(),
            prompts = ctx.prompts.len(),
            clients = ctx.settings.clients().len(),
            persistence = ctx.gateway.is_usable(),
            "Configuration registries ready"
        );
        ctx
    }

    pub fn apply_env_overrides(&self, env: &impl EnvLookup) -> usize {
        self.overrides.apply(&self.models, env)
    }

    pub fn reconcile_prompts(&self) {
        self.reconciler.reconcile(&self.prompts);
    }

    /// Merges a persisted snapshot into the registries.
    ///
    /// The snapshot is validated as a whole first; an invalid one changes
    /// nothing. OCI profiles are ignored since they are re-derived from the
    /// host. Loaded client settings become both reserved clients' settings.
    pub fn merge_snapshot(&self, snapshot: FullSnapshot) -> Result<(), CastorError> {
        validate_snapshot(&snapshot)?;

        let FullSnapshot {
            client_settings,
            model_configs,
            database_configs,
            prompt_configs,
            ..
        } = snapshot;

        let (models, databases, prompts) = (
            model_configs.len(),
            database_configs.len(),
            prompt_configs.len(),
        );
        for model in model_configs {
            self.models.register(model)?;
        }
        for mut database in database_configs {
            // Liveness is re-established by the pool owner, never trusted from storage.
            database.usable = false;
            self.databases.register(database)?;
        }
        for prompt in prompt_configs {
            self.prompts.register(prompt)?;
        }
        self.settings.update(DEFAULT_CLIENT, client_settings.clone())?;
        self.settings.update(SERVER_CLIENT, client_settings)?;

        info!(models, databases, prompts, "Persisted snapshot merged");
        Ok(())
    }

    /// Assembles the full snapshot as seen by `client`.
    pub fn snapshot_for(&self, client: &str) -> Result<FullSnapshot, CastorError> {
        Ok(FullSnapshot {
            client_settings: self.settings.get(client)?,
            model_configs: self.models.list(),
            oci_configs: self.oci.list(),
            database_configs: self.databases.list(),
            prompt_configs: self.prompts.list(),
        })
    }

    /// Saves the service's own snapshot. Returns whether a row was written.
    pub async fn persist(&self) -> bool {
        match self.snapshot_for(SERVER_CLIENT) {
            Ok(snapshot) => self.gateway.save(&snapshot).await,
            Err(e) => {
                warn!(error = %e, "Cannot assemble snapshot for persistence");
                false
            }
        }
    }

    /// Persists a final snapshot and closes the store.
    pub async fn shutdown(&self) {
        self.persist().await;
        self.gateway.close().await;
        info!("Configuration context shut down");
    }
}

/// Checks every entity a snapshot carries before any of it is applied.
/// OCI profiles are left to callers that apply them.
pub(crate) fn validate_snapshot(snapshot: &FullSnapshot) -> Result<(), CastorError> {
    snapshot.client_settings.validate()?;
    for model in &snapshot.model_configs {
        model.validate()?;
    }
    for database in &snapshot.database_configs {
        database.validate()?;
    }
    for prompt in &snapshot.prompt_configs {
        prompt.validate()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use castor_schema::{ClientSettings, DatabaseConfig, ModelConfig, ModelType};

    fn snapshot(client_settings: ClientSettings) -> FullSnapshot {
        FullSnapshot {
            client_settings,
            model_configs: Vec::new(),
            oci_configs: Vec::new(),
            database_configs: Vec::new(),
            prompt_configs: Vec::new(),
        }
    }

    #[test]
    fn merge_resets_database_liveness_and_fills_reserved_clients() {
        let ctx = AppContext::new(PersistenceGateway::disabled());
        let mut settings = ClientSettings::new("whoever");
        settings.ll_model.max_tokens = 256;
        let mut db = DatabaseConfig::new("DEFAULT");
        db.usable = true;
        let mut snap = snapshot(settings);
        snap.database_configs.push(db);

        ctx.merge_snapshot(snap).unwrap();

        assert!(!ctx.databases.list()[0].usable);
        for client in [DEFAULT_CLIENT, SERVER_CLIENT] {
            let stored = ctx.settings.get(client).unwrap();
            assert_eq!(stored.client, client);
            assert_eq!(stored.ll_model.max_tokens, 256);
        }
    }

    #[test]
    fn invalid_snapshot_is_discarded_wholesale() {
        let ctx = AppContext::new(PersistenceGateway::disabled());
        let mut snap = snapshot(ClientSettings::new("default"));
        snap.model_configs.push(ModelConfig::new("ok", ModelType::Ll, "openai"));
        snap.model_configs.push(ModelConfig::new("", ModelType::Ll, "openai"));

        assert!(matches!(
            ctx.merge_snapshot(snap),
            Err(CastorError::Validation(_))
        ));
        assert!(ctx.models.is_empty());
    }
}
