// Common test utilities for integration tests
#![allow(dead_code)]

use authledger_backend::app_data::AppData;
use authledger_backend::config::{DatabaseConnections, EnvironmentProvider, SecretManager, Settings};
use authledger_backend::types::db::audit_event;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const TEST_JWT_SECRET: &str = "integration-secret-key-with-32-characters";
pub const TEST_PASSWORD_PEPPER: &str = "integration-pepper-16";

/// Environment provider backed by a fixed map
#[derive(Default)]
pub struct StaticEnvironment {
    vars: HashMap<String, String>,
}

impl StaticEnvironment {
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }
}

impl EnvironmentProvider for StaticEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Environment for a fully in-memory application
pub fn test_environment() -> StaticEnvironment {
    StaticEnvironment::default()
        .with_var("DATABASE_URL", "sqlite::memory:")
        .with_var("AUDIT_DATABASE_URL", "sqlite::memory:")
        .with_var("JWT_SECRET", TEST_JWT_SECRET)
        .with_var("PASSWORD_PEPPER", TEST_PASSWORD_PEPPER)
}

/// Builds AppData the way main does, against in-memory databases
pub async fn setup_test_app() -> AppData {
    setup_test_app_with(test_environment()).await
}

pub async fn setup_test_app_with(env: StaticEnvironment) -> AppData {
    let settings = Settings::from_env_provider(&env).expect("Failed to load settings");
    let secret_manager =
        Arc::new(SecretManager::from_env_provider(&env).expect("Failed to load secrets"));

    let connections = DatabaseConnections::connect(&settings)
        .await
        .expect("Failed to connect test databases");
    connections.migrate().await.expect("Failed to run migrations");

    AppData::init(connections, secret_manager, &settings)
}

/// Audit rows of one event type in insertion order
pub async fn events_of_type(audit_db: &DatabaseConnection, event_type: &str) -> Vec<audit_event::Model> {
    audit_event::Entity::find()
        .filter(audit_event::Column::EventType.eq(event_type))
        .order_by_asc(audit_event::Column::Id)
        .all(audit_db)
        .await
        .expect("Failed to query audit events")
}

pub async fn all_events(audit_db: &DatabaseConnection) -> Vec<audit_event::Model> {
    audit_event::Entity::find()
        .order_by_asc(audit_event::Column::Id)
        .all(audit_db)
        .await
        .expect("Failed to query audit events")
}

/// Helper to manage environment variables in tests
///
/// Cleans up specified environment variables on creation and drop,
/// ensuring test isolation when dealing with global environment state.
pub struct EnvGuard {
    vars: Vec<String>,
}

impl EnvGuard {
    pub fn new(vars: Vec<&str>) -> Self {
        for var in &vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
        Self {
            vars: vars.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for var in &self.vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }
}

/// Global mutex for tests that modify environment variables
///
/// Environment variables are process-global, so tests that modify them
/// must run serially to avoid race conditions.
pub static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());
