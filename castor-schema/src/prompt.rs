use crate::SensitiveFields;
use serde::{Deserialize, Serialize};

/// An agent prompt.
///
/// `text` is what consumers are served; `default_text` is the last value
/// shipped in code. While `customized` is false the two are kept equal by
/// the boot-time reconciliation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptConfig {
    pub name: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub tags: Vec<String>,

    pub text: String,

    #[serde(default)]
    pub default_text: String,

    #[serde(default)]
    pub customized: bool,
}

impl PromptConfig {
    /// Builds an uncustomized prompt whose served text is the shipped default.
    pub fn shipped(
        name: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        tags: &[&str],
        text: impl Into<String>,
    ) -> Self {
        let text = text.into();
        Self {
            name: name.into(),
            title: title.into(),
            description: description.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            default_text: text.clone(),
            text,
            customized: false,
        }
    }
}

impl SensitiveFields for PromptConfig {
    const SENSITIVE_FIELDS: &'static [&'static str] = &[];
}
