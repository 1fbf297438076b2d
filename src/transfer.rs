//! Export, comparison and import of full settings snapshots.

use crate::context::{AppContext, validate_snapshot};
use crate::error::CastorError;
use crate::registry::RegistryEntry;
use crate::utils::logging::debug_diff_report;
use castor_diff::{DiffPolicy, DiffReport, SettingsDiffer};
use castor_schema::snapshot::CLIENT_IDENTITY_PATH;
use castor_schema::{FullSnapshot, OciProfileConfig};
use serde_json::Value;
use tracing::info;

/// Differ configured for snapshots: every declared secret field is
/// sensitive and the client identity is never compared.
pub fn snapshot_differ() -> SettingsDiffer {
    SettingsDiffer::new(
        DiffPolicy::new()
            .with_sensitive(FullSnapshot::sensitive_fields())
            .with_skipped_path(CLIENT_IDENTITY_PATH),
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    /// The upload was equivalent to the current state; nothing was applied.
    Unchanged,
    Applied {
        report: DiffReport,
        /// Whether the resulting state reached the persistence store.
        persisted: bool,
    },
}

impl AppContext {
    /// The snapshot seen by `client` as JSON, with secrets removed unless
    /// `include_sensitive` is set.
    pub fn export_snapshot(
        &self,
        client: &str,
        include_sensitive: bool,
    ) -> Result<Value, CastorError> {
        let mut value = serde_json::to_value(self.snapshot_for(client)?)?;
        if !include_sensitive {
            snapshot_differ().policy().strip_sensitive(&mut value);
        }
        Ok(value)
    }

    /// Diffs an uploaded snapshot against the current one without applying it.
    pub fn compare_snapshot(
        &self,
        client: &str,
        uploaded: &Value,
    ) -> Result<DiffReport, CastorError> {
        let current = self.export_snapshot(client, true)?;
        let mut uploaded = uploaded.clone();
        Ok(snapshot_differ().diff(&current, &mut uploaded))
    }

    /// Applies an uploaded snapshot for `client`.
    ///
    /// Secrets the upload omits are inherited from the current state. The
    /// merged upload is parsed and validated in full before anything is
    /// applied, then registries and the client's settings are updated and
    /// the result is persisted on a best-effort basis. Liveness flags are
    /// never taken from the upload, and OCI profiles it leaves unchanged
    /// are not re-applied.
    pub async fn import_snapshot(
        &self,
        client: &str,
        mut uploaded: Value,
    ) -> Result<ImportOutcome, CastorError> {
        let current = self.export_snapshot(client, true)?;
        let differ = snapshot_differ();
        let report = differ.diff(&current, &mut uploaded);
        if report.is_empty() {
            info!(client, "Uploaded snapshot matches current state");
            return Ok(ImportOutcome::Unchanged);
        }
        debug_diff_report(client, &report, differ.policy());

        // The identity is never compared, so the upload may leave it out.
        if let Some(settings) = uploaded.get_mut("client_settings").and_then(Value::as_object_mut) {
            settings.insert("client".to_string(), Value::String(client.to_string()));
        }
        let mut snapshot: FullSnapshot = serde_json::from_value(uploaded)?;
        self.keep_liveness(&mut snapshot);
        validate_snapshot(&snapshot)?;

        let FullSnapshot {
            client_settings,
            model_configs,
            oci_configs,
            database_configs,
            prompt_configs,
        } = snapshot;
        let oci_changes: Vec<OciProfileConfig> = oci_configs
            .into_iter()
            .filter(|p| self.oci.get(&p.key()).ok().as_ref() != Some(p))
            .collect();
        for profile in &oci_changes {
            profile.validate()?;
        }

        for model in model_configs {
            self.models.register(model)?;
        }
        for profile in oci_changes {
            self.oci.register(profile)?;
        }
        for database in database_configs {
            self.databases.register(database)?;
        }
        for prompt in prompt_configs {
            self.prompts.register(prompt)?;
        }
        self.settings.update(client, client_settings)?;
        self.reconcile_prompts();

        let persisted = self.persist().await;
        info!(
            client,
            differences = report.len(),
            buckets = ?report.non_empty_buckets(),
            persisted,
            "Snapshot imported"
        );
        Ok(ImportOutcome::Applied { report, persisted })
    }

    /// Replaces uploaded `usable` flags with the registry's own; entries
    /// new to the registry start unusable.
    fn keep_liveness(&self, snapshot: &mut FullSnapshot) {
        for database in &mut snapshot.database_configs {
            database.usable = self.databases.get(&database.key()).is_ok_and(|d| d.usable);
        }
        for profile in &mut snapshot.oci_configs {
            profile.usable = self.oci.get(&profile.key()).is_ok_and(|p| p.usable);
        }
    }
}
