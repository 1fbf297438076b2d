pub mod database;
pub mod model;
pub mod oci;
pub mod prompt;
pub mod sensitive;
pub mod settings;
pub mod snapshot;

pub use database::DatabaseConfig;
pub use model::{ModelConfig, ModelType};
pub use oci::{OciAuthentication, OciProfileConfig};
pub use prompt::PromptConfig;
pub use sensitive::SensitiveFields;
pub use settings::{
    ClientSettings, DEFAULT_CLIENT, DatabaseSettings, LanguageModelSettings, OciSettings,
    PromptSettings, SERVER_CLIENT, SearchType, SelectAiSettings, VectorSearchSettings,
};
pub use snapshot::FullSnapshot;
