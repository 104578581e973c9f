// Test utilities shared across unit tests
// Only compiled when running tests

use async_trait::async_trait;
use migration::{AuditMigrator, AuthMigrator, MigratorTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::StoreError;
use crate::services::{AuthService, PasswordCrypto, TokenService};
use crate::stores::{
    AuditLog, AuditStore, CredentialRepository, CredentialStore, RevocationList, RevocationStore,
};
use crate::types::db::{account, audit_event};
use crate::types::internal::account::NewAccount;
use crate::types::internal::audit::AuditEvent;

pub const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-characters-long";
pub const TEST_PASSWORD_PEPPER: &str = "test-pepper-for-unit-tests";

/// In-memory auth and audit databases with migrations applied, plus the stores on top
pub struct TestStores {
    pub auth_db: DatabaseConnection,
    pub audit_db: DatabaseConnection,
    pub credential_store: Arc<CredentialStore>,
    pub revocation_store: Arc<RevocationStore>,
    pub audit_store: Arc<AuditStore>,
}

/// Creates test databases and stores with standard configuration
pub async fn setup_test_stores() -> TestStores {
    let auth_db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    AuthMigrator::up(&auth_db, None)
        .await
        .expect("Failed to run auth migrations");

    let audit_db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create audit database");

    AuditMigrator::up(&audit_db, None)
        .await
        .expect("Failed to run audit migrations");

    TestStores {
        credential_store: Arc::new(CredentialStore::new(auth_db.clone())),
        revocation_store: Arc::new(RevocationStore::new(auth_db.clone())),
        audit_store: Arc::new(AuditStore::new(audit_db.clone())),
        auth_db,
        audit_db,
    }
}

/// Auth service wired to real in-memory stores
pub struct TestAuthContext {
    pub auth_db: DatabaseConnection,
    pub audit_db: DatabaseConnection,
    pub credential_store: Arc<CredentialStore>,
    pub revocation_store: Arc<RevocationStore>,
    pub token_service: Arc<TokenService>,
    pub password_crypto: Arc<PasswordCrypto>,
    pub auth_service: Arc<AuthService>,
}

impl TestAuthContext {
    /// Insert an account directly, bypassing the service and its audit trail
    pub async fn insert_account(&self, email: &str, password: &str) -> String {
        let password_hash = self
            .password_crypto
            .hash_password(password)
            .expect("Failed to hash password");

        self.credential_store
            .insert(NewAccount {
                email: email.to_string(),
                password_hash,
                is_admin: false,
                is_valid: false,
            })
            .await
            .expect("Failed to insert account")
    }

    pub async fn promote_to_admin(&self, account_id: &str) {
        let row = account::Entity::find_by_id(account_id.to_string())
            .one(&self.auth_db)
            .await
            .expect("Failed to query account")
            .expect("Account not found");

        let mut active: account::ActiveModel = row.into();
        active.is_admin = Set(true);
        active
            .update(&self.auth_db)
            .await
            .expect("Failed to promote account");
    }
}

/// Creates a full auth test setup backed by the real audit store
pub async fn setup_test_auth_service() -> TestAuthContext {
    let stores = setup_test_stores().await;
    let audit_log: Arc<dyn AuditLog> = stores.audit_store.clone();
    let revocations: Arc<dyn RevocationList> = stores.revocation_store.clone();
    build_auth_context(stores, audit_log, revocations)
}

/// Same as [`setup_test_auth_service`] but with a substitute audit log
pub async fn setup_test_auth_service_with_audit(audit_log: Arc<dyn AuditLog>) -> TestAuthContext {
    let stores = setup_test_stores().await;
    let revocations: Arc<dyn RevocationList> = stores.revocation_store.clone();
    build_auth_context(stores, audit_log, revocations)
}

/// Real stores, except that the service revokes through `revocations`
pub async fn setup_test_auth_service_with_revocations(
    revocations: Arc<dyn RevocationList>,
) -> TestAuthContext {
    let stores = setup_test_stores().await;
    let audit_log: Arc<dyn AuditLog> = stores.audit_store.clone();
    build_auth_context(stores, audit_log, revocations)
}

fn build_auth_context(
    stores: TestStores,
    audit_log: Arc<dyn AuditLog>,
    revocations: Arc<dyn RevocationList>,
) -> TestAuthContext {
    let token_service = Arc::new(TokenService::new(TEST_JWT_SECRET.to_string()));
    let password_crypto = Arc::new(PasswordCrypto::new(TEST_PASSWORD_PEPPER.to_string()));

    let auth_service = Arc::new(AuthService::new(
        stores.credential_store.clone(),
        revocations,
        audit_log,
        token_service.clone(),
        password_crypto.clone(),
    ));

    TestAuthContext {
        auth_db: stores.auth_db,
        audit_db: stores.audit_db,
        credential_store: stores.credential_store,
        revocation_store: stores.revocation_store,
        token_service,
        password_crypto,
        auth_service,
    }
}

/// Audit log whose every append fails
pub struct FailingAuditLog;

#[async_trait]
impl AuditLog for FailingAuditLog {
    async fn append(&self, _event: AuditEvent) -> Result<(), StoreError> {
        Err(StoreError::database(
            "insert_audit_event",
            sea_orm::DbErr::Custom("audit database unavailable".to_string()),
        ))
    }
}

/// Revocation list whose `add` always fails; purges are counted and succeed
#[derive(Default)]
pub struct FailingRevocationAdd {
    pub purges: AtomicUsize,
}

#[async_trait]
impl RevocationList for FailingRevocationAdd {
    async fn add(&self, _token_id: &str, _expiry: Option<DateTime<Utc>>) -> Result<(), StoreError> {
        Err(StoreError::database(
            "add_revoked_token",
            sea_orm::DbErr::Custom("auth database unavailable".to_string()),
        ))
    }

    async fn purge_expired(&self, _as_of: DateTime<Utc>) -> Result<u64, StoreError> {
        self.purges.fetch_add(1, Ordering::SeqCst);
        Ok(0)
    }

    async fn contains(&self, _token_id: &str) -> Result<bool, StoreError> {
        Ok(false)
    }
}

/// All audit rows in insertion order
pub async fn audit_events(audit_db: &DatabaseConnection) -> Vec<audit_event::Model> {
    audit_event::Entity::find()
        .order_by_asc(audit_event::Column::Id)
        .all(audit_db)
        .await
        .expect("Failed to query audit events")
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
