use std::fmt;
use std::str::FromStr;

use crate::config::{ConfigError, EnvironmentProvider, SystemEnvironment};
use crate::services::token_service::{DEFAULT_ACCESS_TOKEN_TTL_MINUTES, DEFAULT_REFRESH_TOKEN_TTL_DAYS};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://authledger.db?mode=rwc";
pub const DEFAULT_AUDIT_DATABASE_URL: &str = "sqlite://authledger_audit.db?mode=rwc";

/// Non-secret runtime settings
#[derive(Clone)]
pub struct Settings {
    database_url: String,
    audit_database_url: String,
    access_token_ttl_minutes: i64,
    refresh_token_ttl_days: i64,
}

impl Settings {
    /// Load settings from the given environment, falling back to defaults
    ///
    /// # Errors
    /// `ConfigError::InvalidValue` for an empty URL or a non-positive lifetime
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: load_url(env, "DATABASE_URL", DEFAULT_DATABASE_URL)?,
            audit_database_url: load_url(env, "AUDIT_DATABASE_URL", DEFAULT_AUDIT_DATABASE_URL)?,
            access_token_ttl_minutes: load_positive(
                env,
                "ACCESS_TOKEN_TTL_MINUTES",
                DEFAULT_ACCESS_TOKEN_TTL_MINUTES,
            )?,
            refresh_token_ttl_days: load_positive(
                env,
                "REFRESH_TOKEN_TTL_DAYS",
                DEFAULT_REFRESH_TOKEN_TTL_DAYS,
            )?,
        })
    }

    /// Convenience method that reads the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_provider(&SystemEnvironment)
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn audit_database_url(&self) -> &str {
        &self.audit_database_url
    }

    pub fn access_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.access_token_ttl_minutes)
    }

    pub fn refresh_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.refresh_token_ttl_days)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("database_url", &self.database_url)
            .field("audit_database_url", &self.audit_database_url)
            .field("access_token_ttl_minutes", &self.access_token_ttl_minutes)
            .field("refresh_token_ttl_days", &self.refresh_token_ttl_days)
            .finish()
    }
}

fn load_url(env: &dyn EnvironmentProvider, name: &str, default: &str) -> Result<String, ConfigError> {
    match env.get_var(name) {
        None => Ok(default.to_string()),
        Some(value) if value.trim().is_empty() => {
            Err(ConfigError::invalid_value(name, &value, "must not be empty"))
        }
        Some(value) => Ok(value),
    }
}

fn load_positive(env: &dyn EnvironmentProvider, name: &str, default: i64) -> Result<i64, ConfigError> {
    let Some(raw) = env.get_var(name) else {
        return Ok(default);
    };

    match i64::from_str(raw.trim()) {
        Ok(value) if value > 0 => Ok(value),
        Ok(_) => Err(ConfigError::invalid_value(name, &raw, "must be greater than zero")),
        Err(e) => Err(ConfigError::invalid_value(name, &raw, e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    #[test]
    fn test_defaults_when_nothing_set() {
        let settings = Settings::from_env_provider(&MockEnvironment::empty()).unwrap();

        assert_eq!(settings.database_url(), DEFAULT_DATABASE_URL);
        assert_eq!(settings.audit_database_url(), DEFAULT_AUDIT_DATABASE_URL);
        assert_eq!(settings.access_token_ttl(), chrono::Duration::minutes(15));
        assert_eq!(settings.refresh_token_ttl(), chrono::Duration::days(30));
    }

    #[test]
    fn test_environment_overrides_defaults() {
        let env = MockEnvironment::empty().with_vars(&[
            ("DATABASE_URL", "sqlite://custom.db?mode=rwc"),
            ("AUDIT_DATABASE_URL", "sqlite://custom_audit.db?mode=rwc"),
            ("ACCESS_TOKEN_TTL_MINUTES", "5"),
            ("REFRESH_TOKEN_TTL_DAYS", " 7 "),
        ]);

        let settings = Settings::from_env_provider(&env).unwrap();

        assert_eq!(settings.database_url(), "sqlite://custom.db?mode=rwc");
        assert_eq!(settings.audit_database_url(), "sqlite://custom_audit.db?mode=rwc");
        assert_eq!(settings.access_token_ttl(), chrono::Duration::minutes(5));
        assert_eq!(settings.refresh_token_ttl(), chrono::Duration::days(7));
    }

    #[test]
    fn test_rejects_empty_database_url() {
        let env = MockEnvironment::empty().with_var("DATABASE_URL", "  ");

        match Settings::from_env_provider(&env) {
            Err(ConfigError::InvalidValue { name, .. }) => assert_eq!(name, "DATABASE_URL"),
            other => panic!("Expected InvalidValue error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_numeric_and_non_positive_lifetimes() {
        for value in ["abc", "0", "-3"] {
            let env = MockEnvironment::empty().with_var("ACCESS_TOKEN_TTL_MINUTES", value);

            match Settings::from_env_provider(&env) {
                Err(ConfigError::InvalidValue { name, value: got, .. }) => {
                    assert_eq!(name, "ACCESS_TOKEN_TTL_MINUTES");
                    assert_eq!(got, value);
                }
                other => panic!("Expected InvalidValue for {value}, got {:?}", other),
            }
        }
    }
}
