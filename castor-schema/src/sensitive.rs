/// Declares which serialized field names of a record carry secrets.
///
/// The names are matched against map keys at every depth of a serialized
/// snapshot, so they must be the serde names (after any rename), not the
/// Rust field identifiers.
pub trait SensitiveFields {
    const SENSITIVE_FIELDS: &'static [&'static str];
}

/// Collects the declared sensitive names of several record types, without duplicates.
pub fn collect(groups: &[&'static [&'static str]]) -> Vec<&'static str> {
    let mut out = Vec::new();
    for name in groups.iter().flat_map(|group| group.iter()) {
        if !out.contains(name) {
            out.push(*name);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_keeps_first_occurrence_order() {
        let names = collect(&[&["api_key", "password"], &["password", "wallet_password"]]);
        assert_eq!(names, vec!["api_key", "password", "wallet_password"]);
    }
}
