use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account id)
    pub sub: String,

    /// Unique token identifier, the revocation key
    pub jti: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    #[serde(rename = "type")]
    pub token_type: TokenType,

    /// Only carried by access tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
}

impl Claims {
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }
}

/// Extra claims bound into an access token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessClaims {
    pub is_admin: bool,
}

/// Result of a successful decode
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedToken {
    pub identity: String,
    pub token_id: String,
    pub expiry: Option<DateTime<Utc>>,
    pub claims: Claims,
}

impl From<Claims> for DecodedToken {
    fn from(claims: Claims) -> Self {
        Self {
            identity: claims.sub.clone(),
            token_id: claims.jti.clone(),
            expiry: claims.expiry(),
            claims,
        }
    }
}

/// Tokens handed out on login
#[derive(Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[access_token]")
            .field("refresh_token", &"[refresh_token]")
            .finish()
    }
}
