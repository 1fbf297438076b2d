pub mod engine;
mod path;
pub mod policy;
pub mod report;

pub use engine::SettingsDiffer;
pub use policy::DiffPolicy;
pub use report::{DiffReport, Mismatch, REDACTED_MARKER};
