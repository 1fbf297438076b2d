use crate::path::{join_index, join_key};
use crate::{DiffPolicy, DiffReport, REDACTED_MARKER};
use serde_json::Value;

/// Recursive structural diff between the current settings tree and an uploaded one.
///
/// Sensitive keys get special treatment:
/// - only in `uploaded`: reported under "Override on Upload", value withheld;
/// - only in `current`: copied into `uploaded` and not reported;
/// - in both and unequal: reported under "Value Mismatch" with both raw values.
///
/// Sequences are compared by position; a longer tail is reported element by
/// element as missing on the other side.
pub struct SettingsDiffer {
    policy: DiffPolicy,
}

impl SettingsDiffer {
    pub fn new(policy: DiffPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &DiffPolicy {
        &self.policy
    }

    /// Diffs `current` against `uploaded`, filling omitted secrets into `uploaded` in place.
    pub fn diff(&self, current: &Value, uploaded: &mut Value) -> DiffReport {
        let mut report = DiffReport::default();
        self.walk(current, uploaded, "", &mut report);
        report
    }

    fn walk(&self, current: &Value, uploaded: &mut Value, path: &str, report: &mut DiffReport) {
        match (current, uploaded) {
            (Value::Object(cur), Value::Object(up)) => {
                for (key, cur_val) in cur {
                    let child = join_key(path, key);
                    if self.policy.is_skipped(&child) {
                        continue;
                    }

                    if self.policy.is_sensitive(key) {
                        match up.get(key) {
                            None => {
                                up.insert(key.clone(), cur_val.clone());
                            }
                            Some(up_val) if up_val != cur_val => {
                                report.record_mismatch(child, cur_val, up_val);
                            }
                            Some(_) => {}
                        }
                        continue;
                    }

                    match up.get_mut(key) {
                        Some(up_val) => self.walk(cur_val, up_val, &child, report),
                        None => {
                            report.missing_in_uploaded.insert(child, cur_val.clone());
                        }
                    }
                }

                for (key, up_val) in up.iter() {
                    if cur.contains_key(key) {
                        continue;
                    }
                    let child = join_key(path, key);
                    if self.policy.is_skipped(&child) {
                        continue;
                    }
                    if self.policy.is_sensitive(key) {
                        report
                            .override_on_upload
                            .insert(child, Value::String(REDACTED_MARKER.to_string()));
                    } else {
                        report.missing_in_current.insert(child, up_val.clone());
                    }
                }
            }

            (Value::Array(cur), Value::Array(up)) => {
                let shared = cur.len().min(up.len());
                for (idx, (cur_item, up_item)) in cur.iter().zip(up.iter_mut()).enumerate() {
                    self.walk(cur_item, up_item, &join_index(path, idx), report);
                }
                for (idx, cur_item) in cur.iter().enumerate().skip(shared) {
                    report
                        .missing_in_uploaded
                        .insert(join_index(path, idx), cur_item.clone());
                }
                for (idx, up_item) in up.iter().enumerate().skip(shared) {
                    report
                        .missing_in_current
                        .insert(join_index(path, idx), up_item.clone());
                }
            }

            (cur, up) => {
                if cur != &*up {
                    report.record_mismatch(path.to_string(), cur, up);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Mismatch;
    use serde_json::json;

    fn differ() -> SettingsDiffer {
        SettingsDiffer::new(
            DiffPolicy::new()
                .with_sensitive(["api_key", "password"])
                .with_skipped_path("client_settings.client"),
        )
    }

    #[test]
    fn diff_against_itself_is_empty() {
        let tree = json!({
            "client_settings": {"client": "a", "ll_model": {"temperature": 0.7}},
            "model_configs": [{"id": "m", "api_key": "k", "tags": [1, 2, 3]}],
            "flag": null
        });
        let mut copy = tree.clone();

        let report = differ().diff(&tree, &mut copy);

        assert!(report.is_empty());
        assert_eq!(copy, tree);
    }

    #[test]
    fn omitted_secret_is_inherited_not_reported() {
        let current = json!({"a": 1, "password": "p1"});
        let mut uploaded = json!({"a": 2});

        let report = differ().diff(&current, &mut uploaded);

        assert_eq!(report.len(), 1);
        assert_eq!(
            report.value_mismatch.get("a"),
            Some(&Mismatch {
                current: json!(1),
                uploaded: json!(2)
            })
        );
        assert_eq!(uploaded, json!({"a": 2, "password": "p1"}));
    }

    #[test]
    fn uploaded_only_secret_is_an_override_without_value() {
        let current = json!({"model_configs": [{"id": "m"}]});
        let mut uploaded = json!({"model_configs": [{"id": "m", "api_key": "sk-new"}]});

        let report = differ().diff(&current, &mut uploaded);

        assert_eq!(
            report.override_on_upload.get("model_configs[0].api_key"),
            Some(&json!(REDACTED_MARKER))
        );
        assert!(report.value_mismatch.is_empty());
        assert!(report.missing_in_current.is_empty());
    }

    #[test]
    fn differing_secrets_surface_both_values() {
        let current = json!({"db": {"password": "old"}});
        let mut uploaded = json!({"db": {"password": "new"}});

        let report = differ().diff(&current, &mut uploaded);

        assert_eq!(
            report.value_mismatch.get("db.password"),
            Some(&Mismatch {
                current: json!("old"),
                uploaded: json!("new")
            })
        );
    }

    #[test]
    fn client_identity_path_is_never_compared() {
        let current = json!({"client_settings": {"client": "a"}});
        let mut uploaded = json!({"client_settings": {"client": "b"}});
        assert!(differ().diff(&current, &mut uploaded).is_empty());

        let mut without = json!({"client_settings": {}});
        assert!(differ().diff(&current, &mut without).is_empty());
    }

    #[test]
    fn missing_keys_land_in_their_buckets() {
        let current = json!({"keep": 1, "gone": {"x": 1}});
        let mut uploaded = json!({"keep": 1, "new": [true]});

        let report = differ().diff(&current, &mut uploaded);

        assert_eq!(report.missing_in_uploaded.get("gone"), Some(&json!({"x": 1})));
        assert_eq!(report.missing_in_current.get("new"), Some(&json!([true])));
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn sequence_tails_are_reported_per_index() {
        let current = json!({"tags": ["a", "b", "c"]});
        let mut uploaded = json!({"tags": ["a", "x"]});

        let report = differ().diff(&current, &mut uploaded);

        assert_eq!(
            report.value_mismatch.get("tags[1]"),
            Some(&Mismatch {
                current: json!("b"),
                uploaded: json!("x")
            })
        );
        assert_eq!(report.missing_in_uploaded.get("tags[2]"), Some(&json!("c")));

        let mut longer = json!({"tags": ["a", "b", "c", "d", "e"]});
        let report = differ().diff(&current, &mut longer);
        assert_eq!(report.missing_in_current.len(), 2);
        assert_eq!(report.missing_in_current.get("tags[4]"), Some(&json!("e")));
    }

    #[test]
    fn shape_change_is_a_plain_mismatch() {
        let current = json!({"model": {"id": "m"}});
        let mut uploaded = json!({"model": "m"});

        let report = differ().diff(&current, &mut uploaded);

        assert_eq!(report.non_empty_buckets(), vec!["Value Mismatch"]);
        assert!(report.value_mismatch.contains_key("model"));
    }
}
