use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::types::db::account::{self, ActiveModel, Entity as Accounts};
use crate::types::internal::account::{Account, AccountChanges, NewAccount};

const EMAIL_CONFLICT: &str = "email already registered";

/// Account persistence used by the auth service
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, StoreError>;

    /// Exact, case-sensitive match
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Insert a new account and return its generated id
    ///
    /// Fails with `StoreError::Conflict` when the email is already taken.
    async fn insert(&self, account: NewAccount) -> Result<String, StoreError>;

    /// Apply `changes` and stamp `updated_at` atomically, returning the updated row
    ///
    /// `Ok(None)` when no account has this id.
    async fn update_and_return(
        &self,
        id: &str,
        changes: AccountChanges,
    ) -> Result<Option<Account>, StoreError>;
}

/// CredentialStore manages accounts in the auth database
pub struct CredentialStore {
    db: DatabaseConnection,
}

impl CredentialStore {
    /// Create a new CredentialStore with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialRepository for CredentialStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, StoreError> {
        Accounts::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| StoreError::database("find_account_by_id", e))?
            .map(Account::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Accounts::find()
            .filter(account::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| StoreError::database("find_account_by_email", e))?
            .map(Account::try_from)
            .transpose()
    }

    async fn insert(&self, new_account: NewAccount) -> Result<String, StoreError> {
        let account_id = Uuid::new_v4().to_string();
        let now = Utc::now().timestamp();

        let model = ActiveModel {
            id: Set(account_id.clone()),
            email: Set(new_account.email),
            password_hash: Set(new_account.password_hash),
            display_name: Set(None),
            is_admin: Set(new_account.is_admin),
            is_valid: Set(new_account.is_valid),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| StoreError::from_write("insert_account", EMAIL_CONFLICT, e))?;

        tracing::debug!(account_id = %account_id, "Account inserted");

        Ok(account_id)
    }

    async fn update_and_return(
        &self,
        id: &str,
        changes: AccountChanges,
    ) -> Result<Option<Account>, StoreError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| StoreError::transaction("begin_update_account", e))?;

        // Dropping the transaction without commit rolls it back
        let Some(existing) = Accounts::find_by_id(id.to_string())
            .one(&txn)
            .await
            .map_err(|e| StoreError::database("find_account_for_update", e))?
        else {
            return Ok(None);
        };

        let mut active: ActiveModel = existing.into();
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(display_name) = changes.display_name {
            active.display_name = Set(Some(display_name));
        }
        if let Some(password_hash) = changes.password_hash {
            active.password_hash = Set(password_hash);
        }
        active.updated_at = Set(Utc::now().timestamp());

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| StoreError::from_write("update_account", EMAIL_CONFLICT, e))?;

        txn.commit()
            .await
            .map_err(|e| StoreError::transaction("commit_update_account", e))?;

        tracing::debug!(account_id = %id, "Account updated");

        Account::try_from(updated).map(Some)
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("db", &"<connection>")
            .finish()
    }
}
