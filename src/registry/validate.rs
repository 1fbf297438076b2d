//! Structural checks applied before an entity reaches a registry.

use crate::error::CastorError;
use castor_schema::{
    ClientSettings, DatabaseConfig, ModelConfig, OciAuthentication, OciProfileConfig, PromptConfig,
};

fn require_non_empty(kind: &str, field: &str, value: &str) -> Result<(), CastorError> {
    if value.trim().is_empty() {
        return Err(CastorError::validation(format!(
            "{kind}.{field} must not be empty"
        )));
    }
    Ok(())
}

fn require_range(
    kind: &str,
    field: &str,
    value: Option<f64>,
    min: f64,
    max: f64,
) -> Result<(), CastorError> {
    match value {
        Some(v) if !(min..=max).contains(&v) => Err(CastorError::validation(format!(
            "{kind}.{field} must be within [{min}, {max}], got {v}"
        ))),
        _ => Ok(()),
    }
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

pub(crate) fn model(m: &ModelConfig) -> Result<(), CastorError> {
    require_non_empty("model", "id", &m.id)?;
    require_non_empty("model", "provider", &m.provider)?;
    if m.provider.contains('/') {
        return Err(CastorError::validation(format!(
            "model.provider must not contain '/': {}",
            m.provider
        )));
    }
    require_range("model", "temperature", m.temperature, 0.0, 2.0)?;
    require_range("model", "top_p", m.top_p, 0.0, 1.0)?;
    require_range("model", "frequency_penalty", m.frequency_penalty, -2.0, 2.0)?;
    require_range("model", "presence_penalty", m.presence_penalty, -2.0, 2.0)?;
    if m.max_tokens == Some(0) || m.max_input_tokens == Some(0) || m.max_chunk_size == Some(0) {
        return Err(CastorError::validation(format!(
            "model {}: token limits must be positive when set",
            m.id
        )));
    }
    Ok(())
}

pub(crate) fn oci_profile(p: &OciProfileConfig) -> Result<(), CastorError> {
    require_non_empty("oci", "auth_profile", &p.auth_profile)?;
    let has_key = is_set(&p.key_file) || is_set(&p.key_content);

    match p.authentication {
        OciAuthentication::ApiKey => {
            let parts = [&p.user, &p.fingerprint, &p.tenancy];
            let present = parts.iter().filter(|v| is_set(v)).count();
            // A blank profile is allowed; a partially filled one is not.
            if present > 0 && (present < parts.len() || !has_key) {
                return Err(CastorError::validation(format!(
                    "oci profile {}: api_key authentication needs user, fingerprint, tenancy and a key",
                    p.auth_profile
                )));
            }
        }
        OciAuthentication::SecurityToken => {
            if !is_set(&p.security_token_file) || !has_key {
                return Err(CastorError::validation(format!(
                    "oci profile {}: security_token authentication needs security_token_file and a key",
                    p.auth_profile
                )));
            }
        }
        OciAuthentication::InstancePrincipal | OciAuthentication::OkeWorkloadIdentity => {}
    }
    Ok(())
}

pub(crate) fn database(d: &DatabaseConfig) -> Result<(), CastorError> {
    require_non_empty("database", "alias", &d.alias)?;
    if d.tcp_connect_timeout == 0 {
        return Err(CastorError::validation(format!(
            "database {}: tcp_connect_timeout must be positive",
            d.alias
        )));
    }
    Ok(())
}

pub(crate) fn prompt(p: &PromptConfig) -> Result<(), CastorError> {
    require_non_empty("prompt", "name", &p.name)
}

pub(crate) fn client_settings(s: &ClientSettings) -> Result<(), CastorError> {
    require_non_empty("settings", "client", &s.client)?;
    require_range(
        "settings",
        "ll_model.temperature",
        Some(s.ll_model.temperature),
        0.0,
        2.0,
    )?;
    require_range("settings", "ll_model.top_p", Some(s.ll_model.top_p), 0.0, 1.0)?;
    require_range(
        "settings",
        "vector_search.score_threshold",
        Some(s.vector_search.score_threshold),
        0.0,
        1.0,
    )?;
    require_range(
        "settings",
        "vector_search.lambda_mult",
        Some(s.vector_search.lambda_mult),
        0.0,
        1.0,
    )?;
    if s.vector_search.top_k == 0 || s.vector_search.fetch_k == 0 {
        return Err(CastorError::validation(
            "settings.vector_search.top_k and fetch_k must be positive",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use castor_schema::ModelType;

    #[test]
    fn blank_api_key_profile_is_accepted_but_partial_is_not() {
        let mut profile = OciProfileConfig::blank("DEFAULT");
        assert!(oci_profile(&profile).is_ok());

        profile.user = Some("ocid1.user.oc1..aaaa".to_string());
        assert!(matches!(
            oci_profile(&profile),
            Err(CastorError::Validation(_))
        ));

        profile.fingerprint = Some("aa:bb".to_string());
        profile.tenancy = Some("ocid1.tenancy.oc1..bbbb".to_string());
        profile.key_file = Some("~/.oci/key.pem".to_string());
        assert!(oci_profile(&profile).is_ok());
    }

    #[test]
    fn security_token_profile_needs_token_file() {
        let mut profile = OciProfileConfig::blank("SESSION");
        profile.authentication = OciAuthentication::SecurityToken;
        profile.key_file = Some("~/.oci/sessions/key.pem".to_string());
        assert!(oci_profile(&profile).is_err());

        profile.security_token_file = Some("~/.oci/sessions/token".to_string());
        assert!(oci_profile(&profile).is_ok());
    }

    #[test]
    fn model_rejects_out_of_range_tuning() {
        let mut m = ModelConfig::new("gpt-4o-mini", ModelType::Ll, "openai");
        m.temperature = Some(2.5);
        assert!(model(&m).is_err());

        m.temperature = Some(0.2);
        m.max_tokens = Some(0);
        assert!(model(&m).is_err());
    }

    #[test]
    fn model_provider_cannot_contain_separator() {
        let m = ModelConfig::new("x", ModelType::Embed, "hf/local");
        assert!(model(&m).is_err());
    }
}
