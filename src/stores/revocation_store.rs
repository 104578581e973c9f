use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::errors::StoreError;
use crate::types::db::revoked_token::{self, Entity as RevokedTokens};

/// Denylist of token identifiers
///
/// Absence from the list means "not known to be revoked", never "valid".
#[async_trait]
pub trait RevocationList: Send + Sync {
    /// Blacklist a token id until `expiry`; listing the same id twice is a no-op
    async fn add(&self, token_id: &str, expiry: Option<DateTime<Utc>>) -> Result<(), StoreError>;

    /// Delete every entry whose expiry is strictly before `as_of`
    ///
    /// Entries without an expiry are kept. Returns the number of entries removed.
    async fn purge_expired(&self, as_of: DateTime<Utc>) -> Result<u64, StoreError>;

    /// Lookup for token-validation middleware
    async fn contains(&self, token_id: &str) -> Result<bool, StoreError>;
}

/// Revoked token storage in the auth database
pub struct RevocationStore {
    db: DatabaseConnection,
}

impl RevocationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RevocationList for RevocationStore {
    async fn add(&self, token_id: &str, expiry: Option<DateTime<Utc>>) -> Result<(), StoreError> {
        let entry = revoked_token::ActiveModel {
            token_id: Set(token_id.to_string()),
            expires_at: Set(expiry.map(|e| e.timestamp())),
            created_at: Set(Utc::now().timestamp()),
        };

        RevokedTokens::insert(entry)
            .on_conflict(
                OnConflict::column(revoked_token::Column::TokenId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| StoreError::database("add_revoked_token", e))?;

        tracing::debug!(token_id = %token_id, "Token revoked");

        Ok(())
    }

    async fn purge_expired(&self, as_of: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = RevokedTokens::delete_many()
            .filter(revoked_token::Column::ExpiresAt.lt(as_of.timestamp()))
            .exec(&self.db)
            .await
            .map_err(|e| StoreError::database("purge_expired_revoked_tokens", e))?;

        if result.rows_affected > 0 {
            tracing::debug!(purged = result.rows_affected, "Purged expired revoked tokens");
        }

        Ok(result.rows_affected)
    }

    async fn contains(&self, token_id: &str) -> Result<bool, StoreError> {
        let entry = RevokedTokens::find_by_id(token_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| StoreError::database("find_revoked_token", e))?;

        Ok(entry.is_some())
    }
}
