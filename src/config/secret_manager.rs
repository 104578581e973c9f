use std::fmt;

use crate::config::{ConfigError, EnvironmentProvider, SecretConfig, SystemEnvironment};

pub const JWT_SECRET: &str = "JWT_SECRET";
pub const PASSWORD_PEPPER: &str = "PASSWORD_PEPPER";

/// Centralized holder for application secrets
///
/// Loaded once at startup. Neither `Debug` nor `Display` reveal the values.
pub struct SecretManager {
    jwt_secret: String,
    password_pepper: String,
}

impl SecretManager {
    /// Load and validate all secrets from the process environment
    pub fn init() -> Result<Self, ConfigError> {
        Self::from_env_provider(&SystemEnvironment)
    }

    /// Load and validate all secrets from the given provider
    ///
    /// # Errors
    /// `ConfigError::Missing` or `ConfigError::InvalidLength` for the first secret
    /// that fails its rules
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, ConfigError> {
        let jwt_secret = Self::load_secret(env, &Self::jwt_config())?;
        let password_pepper = Self::load_secret(env, &Self::pepper_config())?;

        Ok(Self {
            jwt_secret,
            password_pepper,
        })
    }

    fn jwt_config() -> SecretConfig {
        SecretConfig::env_var(JWT_SECRET).required(true).min_length(32)
    }

    fn pepper_config() -> SecretConfig {
        SecretConfig::env_var(PASSWORD_PEPPER).required(true).min_length(16)
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }

    pub(crate) fn load_secret(
        env: &dyn EnvironmentProvider,
        config: &SecretConfig,
    ) -> Result<String, ConfigError> {
        let name = config.secret_type.name();

        let value = match env.get_var(name) {
            Some(v) => v,
            None if !config.required => return Ok(String::new()),
            None => return Err(ConfigError::missing(name)),
        };

        if let Some(min_len) = config.min_length {
            if value.len() < min_len {
                return Err(ConfigError::invalid_length(name, min_len, value.len()));
            }
        }

        Ok(value)
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("jwt_secret", &"<redacted>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretManager {{ secrets_loaded: 2 }}")
    }
}
