use std::collections::HashMap;

/// Source of environment variables.
///
/// Boot code reads the process environment through this so tests can supply
/// a fixed map instead of mutating global state.
pub trait EnvLookup {
    fn var(&self, name: &str) -> Option<String>;

    /// Value of `name` unless it is unset or blank.
    fn non_empty(&self, name: &str) -> Option<String> {
        self.var(name).filter(|v| !v.trim().is_empty())
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvLookup for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<E: EnvLookup + ?Sized> EnvLookup for &E {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}
