use chrono::Utc;
use std::sync::Arc;

use crate::errors::AuthError;
use crate::services::{PasswordCrypto, TokenService};
use crate::stores::{AuditLog, CredentialRepository, RevocationList};
use crate::types::dto::auth::validate_password;
use crate::types::dto::{Credentials, ProfileUpdate};
use crate::types::internal::account::{Account, AccountChanges, NewAccount};
use crate::types::internal::audit::{AuditEvent, EventTargetType, EventType};
use crate::types::internal::auth::{AccessClaims, Claims, TokenPair};

/// Authentication service: registration, login, logout and account updates
///
/// Every state-changing or security-relevant call writes an audit event, failed
/// logins included. Audit writes happen after the primary change commits and are
/// never rolled back into it: a failed write surfaces as `AuthError::AuditWrite`
/// carrying the id of whatever was already committed.
pub struct AuthService {
    credentials: Arc<dyn CredentialRepository>,
    revocations: Arc<dyn RevocationList>,
    audit_log: Arc<dyn AuditLog>,
    token_service: Arc<TokenService>,
    password_crypto: Arc<PasswordCrypto>,
}

impl AuthService {
    pub fn new(
        credentials: Arc<dyn CredentialRepository>,
        revocations: Arc<dyn RevocationList>,
        audit_log: Arc<dyn AuditLog>,
        token_service: Arc<TokenService>,
        password_crypto: Arc<PasswordCrypto>,
    ) -> Self {
        Self {
            credentials,
            revocations,
            audit_log,
            token_service,
            password_crypto,
        }
    }

    /// Create an account and return its id
    ///
    /// # Errors
    /// * `BadRequest` - malformed email or empty password
    /// * `Conflict` - email already registered
    pub async fn register(&self, credentials: Credentials) -> Result<String, AuthError> {
        credentials.validate()?;

        if self.credentials.find_by_email(&credentials.email).await?.is_some() {
            return Err(AuthError::email_conflict());
        }

        let password_hash = self.password_crypto.hash_password(&credentials.password)?;

        // The unique index still guards the race between the check above and this insert
        let account_id = self
            .credentials
            .insert(NewAccount {
                email: credentials.email,
                password_hash,
                is_admin: false,
                is_valid: false,
            })
            .await?;

        tracing::info!(account_id = %account_id, "Account registered");

        self.record(
            AuditEvent::new(EventType::Register).actor(&account_id),
            Some(&account_id),
        )
        .await?;

        Ok(account_id)
    }

    /// Verify credentials and issue an access/refresh token pair
    ///
    /// Unknown email and wrong password fail identically with `Forbidden`.
    pub async fn login(&self, credentials: Credentials) -> Result<TokenPair, AuthError> {
        credentials.validate()?;

        let Some(account) = self.credentials.find_by_email(&credentials.email).await? else {
            tracing::warn!("Login rejected: unknown email");
            // Same Argon2 cost as a wrong password
            self.password_crypto.verify_against_dummy(&credentials.password)?;
            self.record(AuditEvent::new(EventType::LoginFailed), None).await?;
            return Err(AuthError::wrong_credential());
        };

        if !self
            .password_crypto
            .verify_password(&credentials.password, &account.password_hash)?
        {
            tracing::warn!(account_id = %account.id, "Login rejected: wrong password");
            self.record(AuditEvent::new(EventType::LoginFailed).actor(&account.id), None)
                .await?;
            return Err(AuthError::wrong_credential());
        }

        let tokens = TokenPair {
            access_token: self.token_service.issue_access_token(
                &account.id,
                AccessClaims {
                    is_admin: account.is_admin,
                },
            )?,
            refresh_token: self.token_service.issue_refresh_token(&account.id)?,
        };

        // Tokens are only handed out once the login is on record
        self.record(AuditEvent::new(EventType::Login).actor(&account.id), None)
            .await?;

        tracing::info!(account_id = %account.id, "Login succeeded");

        Ok(tokens)
    }

    /// Revoke the presented token and sweep expired revocations
    ///
    /// `claims` come from a token already decoded upstream. Tokens that have not
    /// expired (or carry no expiry) are blacklisted until their expiry. `LOGOUT` is
    /// recorded and the sweep runs even when revocation fails; the first error in the
    /// order audit, revocation, purge is returned.
    pub async fn logout(&self, identity: &str, claims: &Claims) -> Result<(), AuthError> {
        let now = Utc::now();
        let expiry = claims.expiry();

        let still_live = match (claims.exp, expiry) {
            (None, _) => true,
            (Some(_), Some(exp)) => exp > now,
            // exp outside the representable range counts as expired
            (Some(_), None) => false,
        };

        let revoked = if still_live {
            self.revocations.add(&claims.jti, expiry).await
        } else {
            Ok(())
        };

        if let Err(e) = &revoked {
            tracing::error!(account_id = %identity, error = %e, "Failed to revoke token on logout");
        }

        // LOGOUT and the sweep run whatever happened above; errors surface audit first
        let audited = self
            .record(AuditEvent::new(EventType::Logout).actor(identity), None)
            .await;

        let purged = self.revocations.purge_expired(now).await;

        audited?;
        revoked?;
        purged?;

        tracing::info!(account_id = %identity, "Logged out");

        Ok(())
    }

    /// Apply a partial profile update and return the updated account
    ///
    /// # Errors
    /// * `BadRequest` - no fields given, or malformed email
    /// * `Conflict` - email owned by another account; nothing is changed or recorded
    /// * `NotFound` - account absent before or during the update
    pub async fn update_profile(&self, identity: &str, update: ProfileUpdate) -> Result<Account, AuthError> {
        update.validate()?;

        if let Some(email) = update.email.as_deref() {
            if let Some(owner) = self.credentials.find_by_email(email).await? {
                if owner.id != identity {
                    return Err(AuthError::email_conflict());
                }
            }
        }

        let previous = self
            .credentials
            .find_by_id(identity)
            .await?
            .ok_or(AuthError::NotFound)?;

        let change = update.audit_change(&previous);

        let updated = self
            .credentials
            .update_and_return(identity, AccountChanges::from(update))
            .await?
            .ok_or(AuthError::NotFound)?;

        self.record(
            AuditEvent::new(EventType::UpdateData)
                .actor(identity)
                .target(identity, EventTargetType::Profile)
                .change(change),
            Some(identity),
        )
        .await?;

        Ok(updated)
    }

    /// Replace the password hash
    pub async fn update_password(&self, identity: &str, new_password: &str) -> Result<(), AuthError> {
        validate_password(new_password)?;

        let password_hash = self.password_crypto.hash_password(new_password)?;

        self.credentials
            .update_and_return(identity, AccountChanges::password(password_hash))
            .await?
            .ok_or(AuthError::NotFound)?;

        tracing::info!(account_id = %identity, "Password changed");

        self.record(
            AuditEvent::new(EventType::ChangePassword).actor(identity),
            Some(identity),
        )
        .await
    }

    /// Read-only lookup of the caller's own account
    pub async fn get_self(&self, identity: &str) -> Result<Account, AuthError> {
        self.credentials
            .find_by_id(identity)
            .await?
            .ok_or(AuthError::NotFound)
    }

    async fn record(&self, event: AuditEvent, committed_id: Option<&str>) -> Result<(), AuthError> {
        let event_type = event.event_type;

        self.audit_log.append(event).await.map_err(|source| {
            tracing::error!(
                event_type = %event_type,
                committed_id = ?committed_id,
                error = %source,
                "Failed to write audit event"
            );
            AuthError::AuditWrite {
                event_type,
                committed_id: committed_id.map(str::to_string),
                source,
            }
        })
    }
}
