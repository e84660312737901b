pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{BrowseOptions, Config, StorageConfig, TmdbConfig, API_KEY_ENV_VAR};
pub use credentials::CredentialStore;
pub use paths::{PathManager, base_path_override};
