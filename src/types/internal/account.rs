use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::errors::StoreError;
use crate::types::db::account;

/// Account as seen by the services
///
/// The password hash never leaves the process through serialization.
#[derive(Clone, PartialEq, Serialize)]
pub struct Account {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: Option<String>,
    pub is_admin: bool,
    pub is_valid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Current value of a profile field, `null` when unset
    pub fn profile_value(&self, field: ProfileField) -> Value {
        match field {
            ProfileField::Email => Value::String(self.email.clone()),
            ProfileField::DisplayName => self
                .display_name
                .clone()
                .map(Value::String)
                .unwrap_or(Value::Null),
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("display_name", &self.display_name)
            .field("is_admin", &self.is_admin)
            .field("is_valid", &self.is_valid)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

fn timestamp(column: &str, secs: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| StoreError::parse("timestamp", format!("{column} out of range: {secs}")))
}

impl TryFrom<account::Model> for Account {
    type Error = StoreError;

    fn try_from(model: account::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            created_at: timestamp("created_at", model.created_at)?,
            updated_at: timestamp("updated_at", model.updated_at)?,
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            display_name: model.display_name,
            is_admin: model.is_admin,
            is_valid: model.is_valid,
        })
    }
}

/// Profile fields a caller may change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Email,
    DisplayName,
}

impl ProfileField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::DisplayName => "display_name",
        }
    }
}

/// Row to insert on registration
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub is_valid: bool,
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("is_admin", &self.is_admin)
            .field("is_valid", &self.is_valid)
            .finish()
    }
}

/// Columns to overwrite in a single atomic update
///
/// `None` leaves the column untouched. `updated_at` is always stamped by the store.
#[derive(Default, Clone)]
pub struct AccountChanges {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub password_hash: Option<String>,
}

impl AccountChanges {
    pub fn password(password_hash: String) -> Self {
        Self {
            password_hash: Some(password_hash),
            ..Default::default()
        }
    }
}

impl fmt::Debug for AccountChanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountChanges")
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .field("password_hash", &self.password_hash.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
