//! Built-in entity defaults seeded at boot.

pub mod databases;
pub mod models;
pub mod oci;
pub mod prompts;

pub use databases::{default_databases, load_default_databases};
pub use models::{default_models, load_default_models};
pub use oci::{load_host_oci_profiles, parse_oci_config};
pub use prompts::{default_prompts, load_default_prompts};
