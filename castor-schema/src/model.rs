use crate::SensitiveFields;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of model a [`ModelConfig`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    /// Language model (chat / completion).
    Ll,
    Embed,
    Rerank,
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ModelType::Ll => "ll",
            ModelType::Embed => "embed",
            ModelType::Rerank => "rerank",
        };
        f.write_str(s)
    }
}

/// A language / embedding / rerank model offered by a provider.
///
/// Identity is `(id, provider)`, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub id: String,

    #[serde(rename = "type")]
    pub model_type: ModelType,

    pub provider: String,

    #[serde(default)]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_input_tokens: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,

    /// Embedding models only: largest chunk the model accepts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_chunk_size: Option<u32>,
}

impl ModelConfig {
    /// Minimal, disabled model with no credentials or tuning.
    pub fn new(id: impl Into<String>, model_type: ModelType, provider: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model_type,
            provider: provider.into(),
            enabled: false,
            api_base: None,
            api_key: None,
            max_input_tokens: None,
            temperature: None,
            max_tokens: None,
            top_p: None,
            frequency_penalty: None,
            presence_penalty: None,
            max_chunk_size: None,
        }
    }

    /// Soft-reference string used by client settings: `provider/id`.
    pub fn model_key(&self) -> String {
        format!("{}/{}", self.provider, self.id)
    }

    /// Splits a `provider/id` reference. The id itself may contain `/`.
    pub fn split_model_key(key: &str) -> Option<(&str, &str)> {
        let (provider, id) = key.split_once('/')?;
        if provider.is_empty() || id.is_empty() {
            return None;
        }
        Some((provider, id))
    }
}

impl SensitiveFields for ModelConfig {
    const SENSITIVE_FIELDS: &'static [&'static str] = &["api_key"];
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn model_type_uses_short_wire_names() {
        let model = ModelConfig::new("rerank-v3", ModelType::Rerank, "cohere");
        let value = serde_json::to_value(&model).unwrap();
        assert_eq!(value["type"], json!("rerank"));
        assert!(value.get("api_key").is_none());
    }

    #[test]
    fn split_model_key_keeps_slashes_in_id() {
        assert_eq!(
            ModelConfig::split_model_key("huggingface/BAAI/bge-small"),
            Some(("huggingface", "BAAI/bge-small"))
        );
        assert_eq!(ModelConfig::split_model_key("openai"), None);
        assert_eq!(ModelConfig::split_model_key("/gpt-4o"), None);
    }
}
