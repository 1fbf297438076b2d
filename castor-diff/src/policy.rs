use ahash::AHashSet;
use serde_json::Value;

/// Which map keys carry secrets and which paths are never compared.
///
/// Sensitive keys are matched by name at every depth; skipped paths are
/// matched against the full dotted path.
#[derive(Debug, Clone, Default)]
pub struct DiffPolicy {
    sensitive: AHashSet<String>,
    skipped_paths: AHashSet<String>,
}

impl DiffPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sensitive<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sensitive.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_skipped_path(mut self, path: impl Into<String>) -> Self {
        self.skipped_paths.insert(path.into());
        self
    }

    pub fn is_sensitive(&self, key: &str) -> bool {
        self.sensitive.contains(key)
    }

    pub fn is_skipped(&self, path: &str) -> bool {
        self.skipped_paths.contains(path)
    }

    /// Removes every sensitive key from `value`, at any depth.
    pub fn strip_sensitive(&self, value: &mut Value) {
        match value {
            Value::Object(map) => {
                map.retain(|key, _| !self.is_sensitive(key));
                for child in map.values_mut() {
                    self.strip_sensitive(child);
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.strip_sensitive(item);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strip_sensitive_walks_nested_arrays() {
        let policy = DiffPolicy::new().with_sensitive(["api_key", "password"]);
        let mut value = json!({
            "password": "top",
            "model_configs": [
                {"id": "a", "api_key": "k1"},
                {"id": "b"}
            ]
        });

        policy.strip_sensitive(&mut value);

        assert_eq!(
            value,
            json!({"model_configs": [{"id": "a"}, {"id": "b"}]})
        );
    }
}
