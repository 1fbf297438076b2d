use super::ClientSettingsPatch;
use crate::error::CastorError;
use crate::registry::{RegistryEntry, SettingsRegistry};
use castor_schema::{ClientSettings, DEFAULT_CLIENT, SERVER_CLIENT};
use tracing::{debug, info};

/// Keyed store of per-client settings.
///
/// `default` is the template new clients are cloned from; `server` holds the
/// settings the service itself runs with. Both exist from construction on.
#[derive(Clone)]
pub struct ClientSettingsStore {
    registry: SettingsRegistry,
}

impl Default for ClientSettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientSettingsStore {
    pub fn new() -> Self {
        let registry = SettingsRegistry::new();
        registry.seed_if_empty([
            ClientSettings::new(DEFAULT_CLIENT),
            ClientSettings::new(SERVER_CLIENT),
        ]);
        Self { registry }
    }

    /// Creates settings for `client` as a copy of the `default` client's.
    pub fn create(&self, client: &str) -> Result<ClientSettings, CastorError> {
        if self.registry.contains(&client.to_string()) {
            return Err(CastorError::conflict(ClientSettings::KIND, client));
        }
        let settings = self.get(DEFAULT_CLIENT)?.cloned_for(client);
        self.registry.create(settings.clone())?;
        info!(client, "Client settings created from default");
        Ok(settings)
    }

    pub fn get(&self, client: &str) -> Result<ClientSettings, CastorError> {
        self.registry.get(&client.to_string())
    }

    pub fn contains(&self, client: &str) -> bool {
        self.registry.contains(&client.to_string())
    }

    /// Client identifiers in creation order.
    pub fn clients(&self) -> Vec<String> {
        self.registry.list().into_iter().map(|s| s.client).collect()
    }

    /// Replaces the stored settings of an existing client wholesale. The
    /// payload's own `client` field is ignored in favour of `client`.
    pub fn update(
        &self,
        client: &str,
        payload: ClientSettings,
    ) -> Result<ClientSettings, CastorError> {
        if !self.registry.contains(&client.to_string()) {
            return Err(CastorError::not_found(ClientSettings::KIND, client));
        }
        let settings = payload.cloned_for(client);
        self.registry.register(settings.clone())?;
        debug!(client, "Client settings replaced");
        Ok(settings)
    }

    /// Applies a partial update to an existing client.
    pub fn patch(
        &self,
        client: &str,
        patch: ClientSettingsPatch,
    ) -> Result<ClientSettings, CastorError> {
        let current = self.get(client)?;
        let next = patch.apply(&current)?;
        self.update(client, next)
    }

    /// Removes a client. The reserved clients cannot be deleted.
    pub fn delete(&self, client: &str) -> Result<bool, CastorError> {
        if client == DEFAULT_CLIENT || client == SERVER_CLIENT {
            return Err(CastorError::validation(format!(
                "client {client} is reserved"
            )));
        }
        Ok(self.registry.delete(&client.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::PatchField;
    use crate::settings::patch::LanguageModelPatch;

    #[test]
    fn reserved_clients_exist_from_start() {
        let store = ClientSettingsStore::new();
        assert_eq!(store.clients(), vec![DEFAULT_CLIENT, SERVER_CLIENT]);
    }

    #[test]
    fn create_clones_default_and_rejects_duplicates() {
        let store = ClientSettingsStore::new();
        let mut template = store.get(DEFAULT_CLIENT).unwrap();
        template.ll_model.max_tokens = 1024;
        store.update(DEFAULT_CLIENT, template).unwrap();

        let created = store.create("abc").unwrap();
        assert_eq!(created.client, "abc");
        assert_eq!(created.ll_model.max_tokens, 1024);

        assert!(matches!(
            store.create("abc"),
            Err(CastorError::Conflict { .. })
        ));
    }

    #[test]
    fn client_identity_is_case_sensitive() {
        let store = ClientSettingsStore::new();
        store.create("Abc").unwrap();
        assert!(store.get("abc").is_err());
        assert!(store.create("abc").is_ok());
    }

    #[test]
    fn update_requires_existing_client_and_forces_identity() {
        let store = ClientSettingsStore::new();
        assert!(matches!(
            store.update("ghost", ClientSettings::new("ghost")),
            Err(CastorError::NotFound { .. })
        ));

        store.create("abc").unwrap();
        let updated = store.update("abc", ClientSettings::new("other")).unwrap();
        assert_eq!(updated.client, "abc");
        assert!(!store.contains("other"));
    }

    #[test]
    fn failed_patch_keeps_stored_settings() {
        let store = ClientSettingsStore::new();
        store.create("abc").unwrap();

        let patch = ClientSettingsPatch {
            ll_model: LanguageModelPatch {
                temperature: PatchField::Provided(7.0),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(store.patch("abc", patch).is_err());
        assert_eq!(store.get("abc").unwrap().ll_model.temperature, 1.0);
    }

    #[test]
    fn reserved_clients_cannot_be_deleted() {
        let store = ClientSettingsStore::new();
        assert!(store.delete(DEFAULT_CLIENT).is_err());
        store.create("abc").unwrap();
        assert!(store.delete("abc").unwrap());
        assert!(!store.delete("abc").unwrap());
    }
}
