use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::fmt;
use uuid::Uuid;

use crate::errors::AuthError;
use crate::types::internal::auth::{AccessClaims, Claims, DecodedToken, TokenType};

pub const DEFAULT_ACCESS_TOKEN_TTL_MINUTES: i64 = 15;
pub const DEFAULT_REFRESH_TOKEN_TTL_DAYS: i64 = 30;

/// Issues and decodes HS256-signed access and refresh tokens
///
/// Issuing and decoding are pure; revocation is checked by callers against the
/// revocation store using the decoded `token_id`.
pub struct TokenService {
    jwt_secret: String,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
}

impl TokenService {
    /// Create a new TokenService with default token lifetimes
    pub fn new(jwt_secret: String) -> Self {
        Self {
            jwt_secret,
            access_token_ttl: Duration::minutes(DEFAULT_ACCESS_TOKEN_TTL_MINUTES),
            refresh_token_ttl: Duration::days(DEFAULT_REFRESH_TOKEN_TTL_DAYS),
        }
    }

    pub fn with_lifetimes(mut self, access_token_ttl: Duration, refresh_token_ttl: Duration) -> Self {
        self.access_token_ttl = access_token_ttl;
        self.refresh_token_ttl = refresh_token_ttl;
        self
    }

    /// Issue a short-lived access token carrying the admin claim
    pub fn issue_access_token(&self, identity: &str, extra: AccessClaims) -> Result<String, AuthError> {
        let claims = self.claims(identity, TokenType::Access, self.access_token_ttl, Some(extra.is_admin));
        self.sign(&claims)
    }

    /// Issue a longer-lived refresh token
    pub fn issue_refresh_token(&self, identity: &str) -> Result<String, AuthError> {
        let claims = self.claims(identity, TokenType::Refresh, self.refresh_token_ttl, None);
        self.sign(&claims)
    }

    /// Verify signature and expiry, then return the decoded token
    ///
    /// Fails with `AuthError::InvalidToken` on a bad signature, a malformed token,
    /// an expiry in the past or one outside the representable time range. A token
    /// without `exp` is accepted.
    pub fn decode(&self, token: &str) -> Result<DecodedToken, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub"]);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::invalid_token("token has expired"),
            ErrorKind::InvalidSignature => AuthError::invalid_token("signature mismatch"),
            _ => AuthError::invalid_token("malformed token"),
        })?;

        let claims = token_data.claims;
        if claims.exp.is_some() && claims.expiry().is_none() {
            return Err(AuthError::invalid_token("malformed token"));
        }

        Ok(DecodedToken::from(claims))
    }

    fn claims(&self, identity: &str, token_type: TokenType, ttl: Duration, is_admin: Option<bool>) -> Claims {
        let now = Utc::now();
        Claims {
            sub: identity.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: Some((now + ttl).timestamp()),
            token_type,
            is_admin,
        }
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::internal("sign_token", e.to_string()))
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("jwt_secret", &"<redacted>")
            .field("access_token_ttl_minutes", &self.access_token_ttl.num_minutes())
            .field("refresh_token_ttl_days", &self.refresh_token_ttl.num_days())
            .finish()
    }
}

impl fmt::Display for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TokenService {{ access_token_ttl: {}min, refresh_token_ttl: {}days }}",
            self.access_token_ttl.num_minutes(),
            self.refresh_token_ttl.num_days()
        )
    }
}
