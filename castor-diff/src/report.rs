use crate::DiffPolicy;
use crate::path::leaf_key;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Placeholder recorded for a secret supplied only by the uploader.
pub const REDACTED_MARKER: &str = "[REDACTED]";

/// Both sides of a differing value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mismatch {
    pub current: Value,
    pub uploaded: Value,
}

/// Result of a settings diff, bucketed by kind of difference and keyed by path.
///
/// Empty buckets are left out of the serialized form; a report with no
/// entries at all means the two trees are equivalent for import purposes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffReport {
    #[serde(
        rename = "Value Mismatch",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub value_mismatch: BTreeMap<String, Mismatch>,

    #[serde(
        rename = "Missing in Uploaded",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub missing_in_uploaded: BTreeMap<String, Value>,

    #[serde(
        rename = "Missing in Current",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub missing_in_current: BTreeMap<String, Value>,

    #[serde(
        rename = "Override on Upload",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub override_on_upload: BTreeMap<String, Value>,
}

impl DiffReport {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of entries across all buckets.
    pub fn len(&self) -> usize {
        self.value_mismatch.len()
            + self.missing_in_uploaded.len()
            + self.missing_in_current.len()
            + self.override_on_upload.len()
    }

    /// Names of the buckets that hold at least one entry.
    pub fn non_empty_buckets(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if !self.value_mismatch.is_empty() {
            out.push("Value Mismatch");
        }
        if !self.missing_in_uploaded.is_empty() {
            out.push("Missing in Uploaded");
        }
        if !self.missing_in_current.is_empty() {
            out.push("Missing in Current");
        }
        if !self.override_on_upload.is_empty() {
            out.push("Override on Upload");
        }
        out
    }

    /// Copy that is safe to log or display: a value recorded under a
    /// sensitive key becomes the marker, and sensitive keys nested inside
    /// recorded values are removed.
    pub fn redacted(&self, policy: &DiffPolicy) -> DiffReport {
        let scrub = |path: &str, value: &Value| {
            if policy.is_sensitive(leaf_key(path)) {
                return Value::String(REDACTED_MARKER.to_string());
            }
            let mut value = value.clone();
            policy.strip_sensitive(&mut value);
            value
        };
        let scrub_bucket = |bucket: &BTreeMap<String, Value>| -> BTreeMap<String, Value> {
            bucket
                .iter()
                .map(|(path, value)| (path.clone(), scrub(path, value)))
                .collect()
        };

        DiffReport {
            value_mismatch: self
                .value_mismatch
                .iter()
                .map(|(path, m)| {
                    let scrubbed = Mismatch {
                        current: scrub(path, &m.current),
                        uploaded: scrub(path, &m.uploaded),
                    };
                    (path.clone(), scrubbed)
                })
                .collect(),
            missing_in_uploaded: scrub_bucket(&self.missing_in_uploaded),
            missing_in_current: scrub_bucket(&self.missing_in_current),
            override_on_upload: scrub_bucket(&self.override_on_upload),
        }
    }

    pub(crate) fn record_mismatch(&mut self, path: String, current: &Value, uploaded: &Value) {
        self.value_mismatch.insert(
            path,
            Mismatch {
                current: current.clone(),
                uploaded: uploaded.clone(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_buckets_are_pruned_from_serialized_report() {
        let mut report = DiffReport::default();
        assert_eq!(serde_json::to_value(&report).unwrap(), json!({}));

        report
            .missing_in_current
            .insert("vector_search.top_k".to_string(), json!(8));

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({"Missing in Current": {"vector_search.top_k": 8}})
        );
        assert_eq!(report.non_empty_buckets(), vec!["Missing in Current"]);
    }

    #[test]
    fn redacted_copy_hides_secrets_but_keeps_paths() {
        let policy = DiffPolicy::new().with_sensitive(["api_key"]);
        let mut report = DiffReport::default();
        report.record_mismatch(
            "model_configs[0].api_key".to_string(),
            &json!("sk-old"),
            &json!("sk-new"),
        );
        report.record_mismatch("ll_model.top_p".to_string(), &json!(1.0), &json!(0.5));
        report.missing_in_current.insert(
            "model_configs[1]".to_string(),
            json!({"id": "m", "api_key": "sk-tail"}),
        );

        let redacted = report.redacted(&policy);

        let rendered = serde_json::to_string(&redacted).unwrap();
        assert!(!rendered.contains("sk-"));
        assert_eq!(
            redacted.value_mismatch["model_configs[0].api_key"].current,
            json!(REDACTED_MARKER)
        );
        assert_eq!(redacted.value_mismatch["ll_model.top_p"].uploaded, json!(0.5));
        assert_eq!(redacted.missing_in_current["model_configs[1]"], json!({"id": "m"}));
        assert_eq!(redacted.len(), report.len());
    }
}
