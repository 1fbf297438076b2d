//! Partial updates of client settings.
//!
//! Every field is tri-state: absent from the payload (`Omitted`, keep),
//! present as `null` (`ExplicitNull`, clear) or present with a value
//! (`Provided`, set). Clearing a non-nullable field is a validation error.

use crate::error::CastorError;
use crate::registry::RegistryEntry;
use castor_schema::{ClientSettings, SearchType};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum PatchField<T> {
    #[default]
    Omitted,
    ExplicitNull,
    Provided(T),
}

impl<T> PatchField<T> {
    pub fn is_omitted(&self) -> bool {
        matches!(self, PatchField::Omitted)
    }

    /// Applies to a field that may be cleared.
    pub fn apply_nullable(self, slot: &mut Option<T>) {
        match self {
            PatchField::Omitted => {}
            PatchField::ExplicitNull => *slot = None,
            PatchField::Provided(v) => *slot = Some(v),
        }
    }

    /// Applies to a field that must always hold a value.
    pub fn apply_required(self, field: &str, slot: &mut T) -> Result<(), CastorError> {
        match self {
            PatchField::Omitted => Ok(()),
            PatchField::ExplicitNull => Err(CastorError::validation(format!(
                "{field} cannot be null"
            ))),
            PatchField::Provided(v) => {
                *slot = v;
                Ok(())
            }
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for PatchField<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only reached when the key is present; absence is handled by `#[serde(default)]`.
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => PatchField::Provided(v),
            None => PatchField::ExplicitNull,
        })
    }
}

impl<T: Serialize> Serialize for PatchField<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PatchField::Provided(v) => v.serialize(serializer),
            PatchField::Omitted | PatchField::ExplicitNull => serializer.serialize_none(),
        }
    }
}

macro_rules! patch_section {
    ($(#[$meta:meta])* $name:ident { $($field:ident: $ty:ty),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $name {
            $(
                #[serde(skip_serializing_if = "PatchField::is_omitted")]
                pub $field: PatchField<$ty>,
            )*
        }
    };
}

patch_section!(LanguageModelPatch {
    model: String,
    chat_history: bool,
    temperature: f64,
    max_tokens: u32,
    top_p: f64,
    frequency_penalty: f64,
    presence_penalty: f64,
});

patch_section!(VectorSearchPatch {
    enabled: bool,
    model: String,
    vector_store: String,
    search_type: SearchType,
    top_k: u32,
    score_threshold: f64,
    fetch_k: u32,
    lambda_mult: f64,
    grading: bool,
    rephrase: bool,
});

patch_section!(DatabasePatch { alias: String });

patch_section!(OciPatch { auth_profile: String });

patch_section!(PromptsPatch { sys: String, ctx: String });

patch_section!(SelectAiPatch {
    enabled: bool,
    profile: String,
});

/// Partial update of a [`ClientSettings`]. The client identity is not patchable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettingsPatch {
    pub ll_model: LanguageModelPatch,
    pub vector_search: VectorSearchPatch,
    pub database: DatabasePatch,
    pub oci: OciPatch,
    pub prompts: PromptsPatch,
    pub selectai: SelectAiPatch,
}

impl ClientSettingsPatch {
    /// Returns `current` with the patch applied. Nothing is returned on error,
    /// so a failed patch never leaves a half-applied value behind.
    pub fn apply(self, current: &ClientSettings) -> Result<ClientSettings, CastorError> {
        let mut next = current.clone();

        macro_rules! set_required {
            ($section:ident . $field:ident) => {
                self.$section.$field.apply_required(
                    concat!(stringify!($section), ".", stringify!($field)),
                    &mut next.$section.$field,
                )?
            };
        }
        macro_rules! set_nullable {
            ($section:ident . $field:ident) => {
                self.$section.$field.apply_nullable(&mut next.$section.$field)
            };
        }

        set_nullable!(ll_model.model);
        set_required!(ll_model.chat_history);
        set_required!(ll_model.temperature);
        set_required!(ll_model.max_tokens);
        set_required!(ll_model.top_p);
        set_required!(ll_model.frequency_penalty);
        set_required!(ll_model.presence_penalty);

        set_required!(vector_search.enabled);
        set_nullable!(vector_search.model);
        set_nullable!(vector_search.vector_store);
        set_required!(vector_search.search_type);
        set_required!(vector_search.top_k);
        set_required!(vector_search.score_threshold);
        set_required!(vector_search.fetch_k);
        set_required!(vector_search.lambda_mult);
        set_required!(vector_search.grading);
        set_required!(vector_search.rephrase);

        set_required!(database.alias);
        set_required!(oci.auth_profile);
        set_required!(prompts.sys);
        set_required!(prompts.ctx);

        set_required!(selectai.enabled);
        set_nullable!(selectai.profile);

        next.validate()?;
        Ok(next)
    }
}
