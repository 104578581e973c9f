use migration::{AuditMigrator, AuthMigrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::config::{ConfigError, Settings};

/// Open connections to the auth and audit databases
///
/// The two are kept apart so audit history survives independently of account data.
#[derive(Debug, Clone)]
pub struct DatabaseConnections {
    pub auth: DatabaseConnection,
    pub audit: DatabaseConnection,
}

impl DatabaseConnections {
    /// Connect to both databases. Does NOT run migrations; call [`Self::migrate`].
    pub async fn connect(settings: &Settings) -> Result<Self, ConfigError> {
        let auth = Database::connect(settings.database_url())
            .await
            .map_err(|e| ConfigError::database("connect_database", e))?;

        tracing::debug!("Connected to auth database: {}", settings.database_url());

        let audit = Database::connect(settings.audit_database_url())
            .await
            .map_err(|e| ConfigError::database("connect_audit_database", e))?;

        tracing::debug!("Connected to audit database: {}", settings.audit_database_url());

        Ok(Self { auth, audit })
    }

    /// Apply pending migrations to both databases
    pub async fn migrate(&self) -> Result<(), ConfigError> {
        migrate_auth_database(&self.auth).await?;
        migrate_audit_database(&self.audit).await?;

        Ok(())
    }
}

pub async fn migrate_auth_database(db: &DatabaseConnection) -> Result<(), ConfigError> {
    AuthMigrator::up(db, None)
        .await
        .map_err(|e| ConfigError::database("run_migrations", e))?;

    tracing::debug!("Auth database migrations completed");

    Ok(())
}

pub async fn migrate_audit_database(audit_db: &DatabaseConnection) -> Result<(), ConfigError> {
    AuditMigrator::up(audit_db, None)
        .await
        .map_err(|e| ConfigError::database("run_audit_migrations", e))?;

    tracing::debug!("Audit database migrations completed");

    Ok(())
}
