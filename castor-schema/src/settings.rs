use crate::SensitiveFields;
use serde::{Deserialize, Serialize};

/// Reserved client identities.
pub const DEFAULT_CLIENT: &str = "default";
pub const SERVER_CLIENT: &str = "server";

/// Per-client runtime settings.
///
/// Every reference to a registry entry (`ll_model.model`, `database.alias`,
/// `oci.auth_profile`, prompt names) is soft: it is resolved by consumers at
/// use time and never validated on write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    pub client: String,

    #[serde(default)]
    pub ll_model: LanguageModelSettings,

    #[serde(default)]
    pub vector_search: VectorSearchSettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub oci: OciSettings,

    #[serde(default)]
    pub prompts: PromptSettings,

    #[serde(default)]
    pub selectai: SelectAiSettings,
}

impl ClientSettings {
    pub fn new(client: impl Into<String>) -> Self {
        Self {
            client: client.into(),
            ll_model: LanguageModelSettings::default(),
            vector_search: VectorSearchSettings::default(),
            database: DatabaseSettings::default(),
            oci: OciSettings::default(),
            prompts: PromptSettings::default(),
            selectai: SelectAiSettings::default(),
        }
    }

    /// Clone of these settings under another client identity.
    pub fn cloned_for(&self, client: impl Into<String>) -> Self {
        Self {
            client: client.into(),
            ..self.clone()
        }
    }
}

impl SensitiveFields for ClientSettings {
    const SENSITIVE_FIELDS: &'static [&'static str] = &[];
}

/// Chat model selection and sampling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageModelSettings {
    /// `provider/id` of the selected model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub chat_history: bool,
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
}

impl Default for LanguageModelSettings {
    fn default() -> Self {
        Self {
            model: None,
            chat_history: true,
            temperature: 1.0,
            max_tokens: 4096,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    #[default]
    Similarity,
    SimilarityScoreThreshold,
    MaximalMarginalRelevance,
}

/// Retrieval options for vector-search augmented chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorSearchSettings {
    pub enabled: bool,
    /// `provider/id` of the embedding model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_store: Option<String>,
    pub search_type: SearchType,
    pub top_k: u32,
    pub score_threshold: f64,
    pub fetch_k: u32,
    pub lambda_mult: f64,
    pub grading: bool,
    pub rephrase: bool,
}

impl Default for VectorSearchSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            model: None,
            vector_store: None,
            search_type: SearchType::Similarity,
            top_k: 4,
            score_threshold: 0.0,
            fetch_k: 20,
            lambda_mult: 0.5,
            grading: true,
            rephrase: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub alias: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            alias: "DEFAULT".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OciSettings {
    pub auth_profile: String,
}

impl Default for OciSettings {
    fn default() -> Self {
        Self {
            auth_profile: "DEFAULT".to_string(),
        }
    }
}

/// Names of the prompts a client uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptSettings {
    pub sys: String,
    pub ctx: String,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            sys: "optimizer_basic-default".to_string(),
            ctx: "optimizer_context-default".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectAiSettings {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sections_fill_in_defaults_when_absent() {
        let settings: ClientSettings = serde_json::from_value(json!({
            "client": "abc",
            "ll_model": {"model": "openai/gpt-4o-mini"}
        }))
        .unwrap();

        assert_eq!(settings.ll_model.model.as_deref(), Some("openai/gpt-4o-mini"));
        assert_eq!(settings.ll_model.max_tokens, 4096);
        assert_eq!(settings.database.alias, "DEFAULT");
        assert_eq!(settings.vector_search.search_type, SearchType::Similarity);
    }

    #[test]
    fn cloned_for_only_changes_identity() {
        let mut base = ClientSettings::new(DEFAULT_CLIENT);
        base.vector_search.top_k = 9;

        let cloned = base.cloned_for("abc");
        assert_eq!(cloned.client, "abc");
        assert_eq!(cloned.vector_search.top_k, 9);
    }
}
