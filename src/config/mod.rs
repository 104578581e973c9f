// Configuration - environment, secrets, logging and database connections
pub mod database;
pub mod env_provider;
pub mod errors;
pub mod logging;
pub mod secret_config;
pub mod secret_manager;
pub mod settings;

pub use database::DatabaseConnections;
#[cfg(test)]
pub use env_provider::MockEnvironment;
pub use env_provider::{EnvironmentProvider, SystemEnvironment};
pub use errors::ConfigError;
pub use logging::{LoggingError, init_logging};
pub use secret_config::{SecretConfig, SecretType};
pub use secret_manager::SecretManager;
pub use settings::Settings;
