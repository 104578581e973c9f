use std::fmt;

use serde::Deserialize;

use crate::errors::AuthError;

/// Email/password pair used by register and login
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Reject malformed input before any lookup happens
    pub fn validate(&self) -> Result<(), AuthError> {
        validate_email(&self.email)?;
        validate_password(&self.password)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Shape check only: one `@`, non-empty local part and domain, no whitespace.
/// Emails are stored and compared exactly as given.
pub(crate) fn validate_email(email: &str) -> Result<(), AuthError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(AuthError::bad_request("email is malformed"))
    }
}

pub(crate) fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::bad_request("password must not be empty"));
    }
    Ok(())
}
