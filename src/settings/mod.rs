//! Per-client settings: the store and the partial-update payload.

pub mod patch;
pub mod store;

pub use patch::{ClientSettingsPatch, PatchField};
pub use store::ClientSettingsStore;
