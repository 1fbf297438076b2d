use crate::error::CastorError;
use crate::registry::validate;
use castor_schema::{ClientSettings, DatabaseConfig, ModelConfig, OciProfileConfig, PromptConfig};
use std::fmt;

/// A record that can live in a [`Registry`](super::Registry).
pub trait RegistryEntry: Clone + Send + Sync + 'static {
    /// Identity used for dedup and lookup. Implementations fold case where
    /// the natural key is case-insensitive.
    type Key: Eq + fmt::Display;

    /// Human-readable entity kind for errors and logs.
    const KIND: &'static str;

    fn key(&self) -> Self::Key;

    /// Structural checks run before any registry mutation.
    fn validate(&self) -> Result<(), CastorError> {
        Ok(())
    }
}

/// Case-folded natural key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FoldedKey(String);

impl FoldedKey {
    pub fn new(raw: &str) -> Self {
        Self(raw.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FoldedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Model identity: case-folded `(id, provider)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelKey {
    pub id: FoldedKey,
    pub provider: FoldedKey,
}

impl ModelKey {
    pub fn new(id: &str, provider: &str) -> Self {
        Self {
            id: FoldedKey::new(id),
            provider: FoldedKey::new(provider),
        }
    }

    /// Parses a `provider/id` soft reference.
    pub fn parse(model_key: &str) -> Option<Self> {
        ModelConfig::split_model_key(model_key).map(|(provider, id)| Self::new(id, provider))
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.id)
    }
}

impl RegistryEntry for ModelConfig {
    type Key = ModelKey;
    const KIND: &'static str = "model";

    fn key(&self) -> ModelKey {
        ModelKey::new(&self.id, &self.provider)
    }

    fn validate(&self) -> Result<(), CastorError> {
        validate::model(self)
    }
}

impl RegistryEntry for OciProfileConfig {
    type Key = FoldedKey;
    const KIND: &'static str = "oci profile";

    fn key(&self) -> FoldedKey {
        FoldedKey::new(&self.auth_profile)
    }

    fn validate(&self) -> Result<(), CastorError> {
        validate::oci_profile(self)
    }
}

impl RegistryEntry for DatabaseConfig {
    type Key = FoldedKey;
    const KIND: &'static str = "database";

    fn key(&self) -> FoldedKey {
        FoldedKey::new(&self.alias)
    }

    fn validate(&self) -> Result<(), CastorError> {
        validate::database(self)
    }
}

impl RegistryEntry for PromptConfig {
    type Key = FoldedKey;
    const KIND: &'static str = "prompt";

    fn key(&self) -> FoldedKey {
        FoldedKey::new(&self.name)
    }

    fn validate(&self) -> Result<(), CastorError> {
        validate::prompt(self)
    }
}

/// Client identities are matched exactly.
impl RegistryEntry for ClientSettings {
    type Key = String;
    const KIND: &'static str = "client settings";

    fn key(&self) -> String {
        self.client.clone()
    }

    fn validate(&self) -> Result<(), CastorError> {
        validate::client_settings(self)
    }
}
