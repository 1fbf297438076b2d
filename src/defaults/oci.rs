//! OCI profiles derived from the host's OCI CLI configuration.
//!
//! Profile state is volatile: it is rebuilt from the host on every boot and
//! never read back from persistence.

use crate::config::BootstrapConfig;
use crate::registry::OciRegistry;
use crate::utils::EnvLookup;
use castor_schema::{OciAuthentication, OciProfileConfig};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{info, warn};

const DEFAULT_PROFILE: &str = "DEFAULT";

/// Parses an OCI CLI config file (INI). Non-`DEFAULT` sections inherit any
/// key they do not set from `DEFAULT`, as the OCI CLI does.
pub fn parse_oci_config(text: &str) -> Vec<OciProfileConfig> {
    let mut sections: Vec<(String, BTreeMap<String, String>)> = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            sections.push((name.trim().to_string(), BTreeMap::new()));
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        if let Some((_, values)) = sections.last_mut() {
            values.insert(key.trim().to_lowercase(), value.trim().to_string());
        }
    }

    let defaults = sections
        .iter()
        .find(|(name, _)| name == DEFAULT_PROFILE)
        .map(|(_, values)| values.clone())
        .unwrap_or_default();

    sections
        .into_iter()
        .map(|(name, mut values)| {
            if name != DEFAULT_PROFILE {
                for (key, value) in &defaults {
                    values.entry(key.clone()).or_insert_with(|| value.clone());
                }
            }
            profile_from_section(name, values)
        })
        .collect()
}

fn profile_from_section(name: String, mut values: BTreeMap<String, String>) -> OciProfileConfig {
    let mut profile = OciProfileConfig::blank(name);
    profile.user = values.remove("user");
    profile.fingerprint = values.remove("fingerprint");
    profile.tenancy = values.remove("tenancy");
    profile.region = values.remove("region");
    profile.key_file = values.remove("key_file");
    profile.key_content = values.remove("key_content");
    profile.pass_phrase = values.remove("pass_phrase");
    profile.security_token_file = values.remove("security_token_file");
    profile.genai_compartment_id = values.remove("genai_compartment_id");
    profile.genai_region = values.remove("genai_region");
    if profile.security_token_file.is_some() {
        profile.authentication = OciAuthentication::SecurityToken;
    }
    profile
}

fn resolve_config_path(cfg: &BootstrapConfig, env: &impl EnvLookup) -> Option<PathBuf> {
    if let Some(path) = cfg.oci_config_file.clone() {
        return Some(path);
    }
    if let Some(path) = env.non_empty("OCI_CLI_CONFIG_FILE") {
        return Some(PathBuf::from(path));
    }
    env.non_empty("HOME")
        .map(|home| PathBuf::from(home).join(".oci").join("config"))
}

/// Rebuilds the OCI registry from the host configuration and `OCI_*` env vars.
///
/// Always leaves at least a `DEFAULT` profile. Returns the number of profiles.
pub fn load_host_oci_profiles(
    registry: &OciRegistry,
    cfg: &BootstrapConfig,
    env: &impl EnvLookup,
) -> usize {
    let mut profiles = match resolve_config_path(cfg, env) {
        Some(path) if path.is_file() => match std::fs::read_to_string(&path) {
            Ok(text) => {
                let parsed = parse_oci_config(&text);
                info!(path = %path.display(), profiles = parsed.len(), "OCI config parsed");
                parsed
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read OCI config; using blank profile");
                Vec::new()
            }
        },
        Some(path) => {
            info!(path = %path.display(), "No OCI config file on host");
            Vec::new()
        }
        None => Vec::new(),
    };

    let active = env
        .non_empty("OCI_CLI_PROFILE")
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string());
    if !profiles.iter().any(|p| p.auth_profile == active) {
        profiles.push(OciProfileConfig::blank(active.clone()));
    }
    if !profiles.iter().any(|p| p.auth_profile == DEFAULT_PROFILE) {
        profiles.push(OciProfileConfig::blank(DEFAULT_PROFILE));
    }

    if let Some(profile) = profiles.iter_mut().find(|p| p.auth_profile == active) {
        if let Some(raw) = env.non_empty("OCI_CLI_AUTH") {
            match OciAuthentication::parse(&raw) {
                Some(auth) => profile.authentication = auth,
                None => warn!(value = %raw, "Ignoring unknown OCI_CLI_AUTH value"),
            }
        }
        if let Some(compartment) = env.non_empty("OCI_GENAI_COMPARTMENT_ID") {
            profile.genai_compartment_id = Some(compartment);
        }
        if let Some(region) = env.non_empty("OCI_GENAI_REGION") {
            profile.genai_region = Some(region);
        }
    }

    let count = profiles.len();
    registry.replace_all(profiles);
    info!(profiles = count, active = %active, "OCI profiles derived from host");
    count
}
