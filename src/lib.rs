pub mod config;
pub mod context;
pub mod db;
pub mod defaults;
pub mod error;
pub mod overrides;
pub mod reconcile;
pub mod registry;
pub mod settings;
pub mod transfer;
pub mod utils;

pub use context::AppContext;
pub use db::PersistenceGateway;
pub use error::CastorError;
pub use overrides::EnvOverrideApplier;
pub use reconcile::DefaultReconciler;
pub use registry::Registry;
pub use settings::ClientSettingsStore;
pub use transfer::ImportOutcome;
