//! Boot-time reconciliation of the prompt registry against the shipped defaults.

use crate::defaults::default_prompts;
use crate::registry::{FoldedKey, PromptRegistry, RegistryEntry};
use ahash::AHashMap;
use castor_schema::PromptConfig;
use tracing::{info, warn};

/// What a reconciliation pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Registry entries dropped because no shipped default carries their name.
    pub removed: Vec<String>,
    /// Entries whose served text was refreshed from the shipped default.
    pub refreshed: Vec<String>,
    /// Customized entries whose served text was kept.
    pub preserved: Vec<String>,
    /// Shipped defaults that were missing from the registry.
    pub inserted: Vec<String>,
}

/// Merges a code-authoritative default set into the prompt registry.
///
/// After [`reconcile`](Self::reconcile) the registry holds exactly the
/// default names. Every entry's `default_text` is the shipped text, and
/// `text` equals it unless the entry is customized. The `customized` flag
/// itself is only ever changed by explicit edits.
#[derive(Debug, Clone)]
pub struct DefaultReconciler {
    defaults: Vec<PromptConfig>,
}

impl Default for DefaultReconciler {
    fn default() -> Self {
        Self::new(default_prompts())
    }
}

impl DefaultReconciler {
    /// Later duplicates of a name in `defaults` are ignored.
    pub fn new(defaults: Vec<PromptConfig>) -> Self {
        let mut unique: Vec<PromptConfig> = Vec::with_capacity(defaults.len());
        for prompt in defaults {
            if !unique.iter().any(|p| p.key() == prompt.key()) {
                unique.push(prompt);
            }
        }
        Self { defaults: unique }
    }

    pub fn defaults(&self) -> &[PromptConfig] {
        &self.defaults
    }

    pub fn reconcile(&self, registry: &PromptRegistry) -> ReconcileOutcome {
        let by_key: AHashMap<FoldedKey, &PromptConfig> =
            self.defaults.iter().map(|p| (p.key(), p)).collect();
        let mut outcome = ReconcileOutcome::default();

        registry.with_entries_mut(|entries| {
            entries.retain(|entry| {
                if by_key.contains_key(&entry.key()) {
                    return true;
                }
                if entry.customized {
                    // No archive exists; the customization is lost here.
                    warn!(prompt = %entry.name, "Dropping customized prompt with no shipped default");
                }
                outcome.removed.push(entry.name.clone());
                false
            });

            for entry in entries.iter_mut() {
                let Some(shipped) = by_key.get(&entry.key()) else {
                    continue;
                };
                entry.default_text = shipped.text.clone();
                entry.title = shipped.title.clone();
                entry.description = shipped.description.clone();
                entry.tags = shipped.tags.clone();

                if entry.customized {
                    outcome.preserved.push(entry.name.clone());
                } else {
                    if entry.text != entry.default_text {
                        outcome.refreshed.push(entry.name.clone());
                    }
                    entry.text = entry.default_text.clone();
                }
            }

            for shipped in &self.defaults {
                let key = shipped.key();
                if entries.iter().any(|e| e.key() == key) {
                    continue;
                }
                let mut fresh = shipped.clone();
                fresh.default_text = shipped.text.clone();
                fresh.customized = false;
                entries.push(fresh);
                outcome.inserted.push(shipped.name.clone());
            }
        });

        info!(
            removed = outcome.removed.len(),
            refreshed = outcome.refreshed.len(),
            preserved = outcome.preserved.len(),
            inserted = outcome.inserted.len(),
            total = registry.len(),
            "Prompt defaults reconciled"
        );
        outcome
    }
}
