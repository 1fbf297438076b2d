use super::{FoldedKey, PromptRegistry, RegistryEntry};
use crate::error::CastorError;
use castor_schema::PromptConfig;

impl PromptRegistry {
    /// Sets the served text of a prompt; it counts as customized exactly when
    /// it differs from the shipped default.
    pub fn set_text(&self, name: &str, text: impl Into<String>) -> Result<PromptConfig, CastorError> {
        let text = text.into();
        self.edit(name, |prompt| {
            prompt.customized = text != prompt.default_text;
            prompt.text = text;
        })
    }

    /// Drops any customization and serves the shipped default again.
    pub fn reset(&self, name: &str) -> Result<PromptConfig, CastorError> {
        self.edit(name, |prompt| {
            prompt.text = prompt.default_text.clone();
            prompt.customized = false;
        })
    }

    fn edit(
        &self,
        name: &str,
        apply: impl FnOnce(&mut PromptConfig),
    ) -> Result<PromptConfig, CastorError> {
        let key = FoldedKey::new(name);
        self.with_entries_mut(|entries| {
            let prompt = entries
                .iter_mut()
                .find(|p| p.key() == key)
                .ok_or_else(|| CastorError::not_found(PromptConfig::KIND, name))?;
            apply(prompt);
            Ok(prompt.clone())
        })
    }
}
