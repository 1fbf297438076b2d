//! Dotted / bracketed path strings used as diff report keys.

pub(crate) fn join_key(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

pub(crate) fn join_index(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

/// Last map key of a report path, ignoring trailing indices.
pub(crate) fn leaf_key(path: &str) -> &str {
    let mut rest = path;
    while let Some(open) = rest.strip_suffix(']').and_then(|p| p.rfind('[')) {
        rest = &rest[..open];
    }
    rest.rsplit('.').next().unwrap_or(rest)
}
