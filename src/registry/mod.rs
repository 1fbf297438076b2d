//! In-memory entity registries.
//!
//! Layout:
//! - `entry.rs`: identity keys and the per-entity `RegistryEntry` impls
//! - `validate.rs`: structural checks run before any mutation
//! - `models.rs` / `prompts.rs`: entity-specific operations

pub mod entry;
pub mod models;
pub mod prompts;
mod validate;

pub use entry::{FoldedKey, ModelKey, RegistryEntry};

use crate::error::CastorError;
use castor_schema::{ClientSettings, DatabaseConfig, ModelConfig, OciProfileConfig, PromptConfig};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub type ModelRegistry = Registry<ModelConfig>;
pub type OciRegistry = Registry<OciProfileConfig>;
pub type DatabaseRegistry = Registry<DatabaseConfig>;
pub type PromptRegistry = Registry<PromptConfig>;
pub type SettingsRegistry = Registry<ClientSettings>;

/// Ordered collection with dedup-by-identity-key.
///
/// A `Registry` is a handle: clones share the same backing collection, so a
/// holder observes every later mutation without re-fetching. Writers are
/// serialized by an internal lock; each operation is atomic on its own, but
/// a read followed by a write is not.
pub struct Registry<T> {
    entries: Arc<RwLock<Vec<T>>>,
}

impl<T> Clone for Registry<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<T: RegistryEntry> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RegistryEntry> Registry<T> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Upsert: drops any entry with the same identity key, then appends. Last write wins.
    pub fn register(&self, entry: T) -> Result<(), CastorError> {
        entry.validate()?;
        let key = entry.key();
        let mut entries = self.write();
        entries.retain(|e| e.key() != key);
        entries.push(entry);
        Ok(())
    }

    /// Insert that refuses to overwrite an existing identity key.
    pub fn create(&self, entry: T) -> Result<(), CastorError> {
        entry.validate()?;
        let key = entry.key();
        let mut entries = self.write();
        if entries.iter().any(|e| e.key() == key) {
            return Err(CastorError::conflict(T::KIND, key.to_string()));
        }
        entries.push(entry);
        Ok(())
    }

    pub fn get(&self, key: &T::Key) -> Result<T, CastorError> {
        self.read()
            .iter()
            .find(|e| e.key() == *key)
            .cloned()
            .ok_or_else(|| CastorError::not_found(T::KIND, key.to_string()))
    }

    pub fn contains(&self, key: &T::Key) -> bool {
        self.read().iter().any(|e| e.key() == *key)
    }

    pub fn list(&self) -> Vec<T> {
        self.read().clone()
    }

    /// Removes the entry for `key`. Returns whether anything was removed;
    /// an absent key is not an error.
    pub fn delete(&self, key: &T::Key) -> bool {
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|e| e.key() != *key);
        entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Populate-once: fills an empty registry with `defaults` and returns how
    /// many entries were added. A non-empty registry is left untouched.
    pub fn seed_if_empty(&self, defaults: impl IntoIterator<Item = T>) -> usize {
        let mut entries = self.write();
        if !entries.is_empty() {
            return 0;
        }
        for entry in defaults {
            let key = entry.key();
            entries.retain(|e| e.key() != key);
            entries.push(entry);
        }
        entries.len()
    }

    /// Replaces the whole contents in place; the handle identity is kept.
    pub fn replace_all(&self, next: Vec<T>) {
        let mut entries = self.write();
        entries.clear();
        entries.extend(next);
    }

    /// Runs `f` with exclusive access to the backing collection.
    ///
    /// Reserved for reconciliation passes; callers must keep identity keys unique.
    pub(crate) fn with_entries_mut<R>(&self, f: impl FnOnce(&mut Vec<T>) -> R) -> R {
        let mut entries = self.write();
        f(&mut entries)
    }

    /// True when both handles point at the same backing collection.
    pub fn same_collection(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}
