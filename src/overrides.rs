//! Deployment-time environment overrides for model entries.
//!
//! A snapshot restored from persistence may carry stale or empty secrets;
//! values supplied through the environment always win and force the
//! matching entries on.

use crate::registry::ModelRegistry;
use crate::utils::EnvLookup;
use castor_schema::ModelConfig;
use std::fmt;
use tracing::{debug, info};

/// Model field an override may set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelField {
    ApiKey,
    ApiBase,
}

impl ModelField {
    fn set(self, model: &mut ModelConfig, value: &str) {
        let slot = match self {
            ModelField::ApiKey => &mut model.api_key,
            ModelField::ApiBase => &mut model.api_base,
        };
        *slot = Some(value.to_string());
    }
}

impl fmt::Display for ModelField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModelField::ApiKey => "api_key",
            ModelField::ApiBase => "api_base",
        })
    }
}

/// One `(env_var, provider, field)` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvOverride {
    pub env_var: &'static str,
    pub provider: &'static str,
    pub field: ModelField,
}

pub const STANDARD_OVERRIDES: &[EnvOverride] = &[
    EnvOverride {
        env_var: "OPENAI_API_KEY",
        provider: "openai",
        field: ModelField::ApiKey,
    },
    EnvOverride {
        env_var: "COHERE_API_KEY",
        provider: "cohere",
        field: ModelField::ApiKey,
    },
    EnvOverride {
        env_var: "PPLX_API_KEY",
        provider: "perplexity",
        field: ModelField::ApiKey,
    },
    EnvOverride {
        env_var: "ON_PREM_OLLAMA_URL",
        provider: "ollama",
        field: ModelField::ApiBase,
    },
    EnvOverride {
        env_var: "ON_PREM_HF_URL",
        provider: "huggingface",
        field: ModelField::ApiBase,
    },
];

/// Applies a static override table to the model registry.
///
/// Safe to run any number of times: with an unchanged environment every
/// run leaves the registry in the same state. Entries of providers without
/// a table row are never touched, and no entry is ever disabled.
#[derive(Debug, Clone)]
pub struct EnvOverrideApplier {
    table: &'static [EnvOverride],
}

impl Default for EnvOverrideApplier {
    fn default() -> Self {
        Self::new(STANDARD_OVERRIDES)
    }
}

impl EnvOverrideApplier {
    pub fn new(table: &'static [EnvOverride]) -> Self {
        Self { table }
    }

    /// Returns how many (row, entry) updates were made.
    pub fn apply(&self, registry: &ModelRegistry, env: &impl EnvLookup) -> usize {
        let mut updated = 0;
        for row in self.table {
            // Blank values count as unset so an empty export never enables a provider.
            let Some(value) = env.non_empty(row.env_var) else {
                debug!(env_var = row.env_var, "Env override not set");
                continue;
            };

            let touched = registry.with_entries_mut(|entries| {
                let mut touched = 0;
                for model in entries
                    .iter_mut()
                    .filter(|m| m.provider.eq_ignore_ascii_case(row.provider))
                {
                    row.field.set(model, &value);
                    model.enabled = true;
                    touched += 1;
                }
                touched
            });

            info!(
                env_var = row.env_var,
                provider = row.provider,
                field = %row.field,
                entries = touched,
                "Env override applied"
            );
            updated += touched;
        }
        updated
    }
}
