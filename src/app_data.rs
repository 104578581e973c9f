use std::sync::Arc;

use crate::config::{DatabaseConnections, SecretManager, Settings};
use crate::services::{AuthService, PasswordCrypto, TokenService};
use crate::stores::{AuditStore, CredentialStore, RevocationStore};

/// Centralized application data following the main-owned stores pattern
///
/// Everything is created once at startup and shared by reference.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init()
///   ↓ creates once
///   ├─ connections (auth + audit DatabaseConnection)
///   ├─ secret_manager (Arc<SecretManager>)
///   ├─ audit_store (Arc<AuditStore>)          ← audit database
///   ├─ credential_store (Arc<CredentialStore>) ← auth database
///   ├─ revocation_store (Arc<RevocationStore>) ← auth database
///   ├─ token_service (Arc<TokenService>)
///   ├─ password_crypto (Arc<PasswordCrypto>)
///   └─ auth_service (Arc<AuthService>)
/// ```
pub struct AppData {
    pub connections: DatabaseConnections,
    pub secret_manager: Arc<SecretManager>,
    pub audit_store: Arc<AuditStore>,
    pub credential_store: Arc<CredentialStore>,
    pub revocation_store: Arc<RevocationStore>,
    pub token_service: Arc<TokenService>,
    pub password_crypto: Arc<PasswordCrypto>,
    pub auth_service: Arc<AuthService>,
}

impl AppData {
    /// Wire stores and services on top of already-migrated connections
    pub fn init(
        connections: DatabaseConnections,
        secret_manager: Arc<SecretManager>,
        settings: &Settings,
    ) -> Self {
        tracing::info!("Initializing AppData...");

        let audit_store = Arc::new(AuditStore::new(connections.audit.clone()));
        let credential_store = Arc::new(CredentialStore::new(connections.auth.clone()));
        let revocation_store = Arc::new(RevocationStore::new(connections.auth.clone()));
        tracing::debug!("Stores created");

        let token_service = Arc::new(
            TokenService::new(secret_manager.jwt_secret().to_string())
                .with_lifetimes(settings.access_token_ttl(), settings.refresh_token_ttl()),
        );
        let password_crypto = Arc::new(PasswordCrypto::new(
            secret_manager.password_pepper().to_string(),
        ));
        tracing::debug!(token_service = %token_service, "Token service configured");

        let auth_service = Arc::new(AuthService::new(
            credential_store.clone(),
            revocation_store.clone(),
            audit_store.clone(),
            token_service.clone(),
            password_crypto.clone(),
        ));

        tracing::info!("AppData initialization complete");

        Self {
            connections,
            secret_manager,
            audit_store,
            credential_store,
            revocation_store,
            token_service,
            password_crypto,
            auth_service,
        }
    }
}
