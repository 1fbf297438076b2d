use super::{ModelKey, ModelRegistry};
use crate::error::CastorError;
use castor_schema::{ModelConfig, ModelType};

impl ModelRegistry {
    /// Resolves a `provider/id` soft reference as stored in client settings.
    pub fn get_by_model_key(&self, model_key: &str) -> Result<ModelConfig, CastorError> {
        let key = ModelKey::parse(model_key).ok_or_else(|| {
            CastorError::validation(format!("malformed model reference: {model_key}"))
        })?;
        self.get(&key)
    }

    /// Enabled models of one type, in registry order.
    pub fn list_enabled(&self, model_type: ModelType) -> Vec<ModelConfig> {
        self.list()
            .into_iter()
            .filter(|m| m.enabled && m.model_type == model_type)
            .collect()
    }
}
