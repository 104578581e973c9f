/// Failures while loading configuration or opening databases at startup
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Required setting '{name}' is missing")]
    Missing { name: String },

    #[error("Setting '{name}' must be at least {expected} characters, got {actual}")]
    InvalidLength {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Setting '{name}' has invalid value '{value}': {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Database error during {operation}: {source}")]
    Database {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },
}

impl ConfigError {
    pub fn missing(name: &str) -> Self {
        Self::Missing {
            name: name.to_string(),
        }
    }

    pub fn invalid_length(name: &str, expected: usize, actual: usize) -> Self {
        Self::InvalidLength {
            name: name.to_string(),
            expected,
            actual,
        }
    }

    pub fn invalid_value(name: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn database(operation: impl Into<String>, source: sea_orm::DbErr) -> Self {
        Self::Database {
            operation: operation.into(),
            source,
        }
    }
}
