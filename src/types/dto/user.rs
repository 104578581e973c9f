use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::AuthError;
use crate::types::dto::auth::validate_email;
use crate::types::internal::account::{Account, AccountChanges, ProfileField};
use crate::types::internal::audit::AuditChange;

/// Partial profile update; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl ProfileUpdate {
    pub fn display_name(value: impl Into<String>) -> Self {
        Self {
            display_name: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn email(value: impl Into<String>) -> Self {
        Self {
            email: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), AuthError> {
        if self.fields().is_empty() {
            return Err(AuthError::bad_request("no profile fields to update"));
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }

    /// The changed field set with the requested values
    pub fn fields(&self) -> Vec<(ProfileField, &str)> {
        let mut fields = Vec::new();
        if let Some(email) = &self.email {
            fields.push((ProfileField::Email, email.as_str()));
        }
        if let Some(display_name) = &self.display_name {
            fields.push((ProfileField::DisplayName, display_name.as_str()));
        }
        fields
    }

    /// Old/new snapshots restricted to the changed field set
    pub fn audit_change(&self, previous: &Account) -> AuditChange {
        let mut old_data = Map::new();
        let mut new_data = Map::new();
        for (field, value) in self.fields() {
            old_data.insert(field.as_str().to_string(), previous.profile_value(field));
            new_data.insert(field.as_str().to_string(), Value::String(value.to_string()));
        }
        AuditChange { old_data, new_data }
    }
}

impl From<ProfileUpdate> for AccountChanges {
    fn from(update: ProfileUpdate) -> Self {
        Self {
            email: update.email,
            display_name: update.display_name,
            password_hash: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn account() -> Account {
        Account {
            id: "acc-1".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "hash".to_string(),
            display_name: None,
            is_admin: false,
            is_valid: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_update_is_rejected() {
        let result = ProfileUpdate::default().validate();
        assert!(matches!(result, Err(AuthError::BadRequest(_))));
    }

    #[test]
    fn test_malformed_email_is_rejected() {
        assert!(ProfileUpdate::email("not-an-email").validate().is_err());
    }

    #[test]
    fn test_audit_change_only_covers_changed_fields() {
        let change = ProfileUpdate::display_name("Alice").audit_change(&account());

        assert_eq!(serde_json::to_value(&change.new_data).unwrap(), json!({"display_name": "Alice"}));
        assert_eq!(serde_json::to_value(&change.old_data).unwrap(), json!({"display_name": null}));
    }

    #[test]
    fn test_audit_change_records_previous_email() {
        let change = ProfileUpdate::email("alice@new.example").audit_change(&account());

        assert_eq!(change.old_data.get("email"), Some(&json!("alice@example.com")));
        assert_eq!(change.new_data.get("email"), Some(&json!("alice@new.example")));
    }

    #[test]
    fn test_deserializes_partial_json() {
        let update: ProfileUpdate = serde_json::from_str(r#"{"display_name":"Alice"}"#).unwrap();

        assert_eq!(update.email, None);
        assert_eq!(update.display_name.as_deref(), Some("Alice"));
    }
}
