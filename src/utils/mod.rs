pub mod env;
pub(crate) mod logging;

pub use env::{EnvLookup, ProcessEnv};
