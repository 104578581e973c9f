// Account commands: register, login, logout and whoami

use crate::errors::AuthError;
use crate::services::{AuthService, TokenService};
use crate::stores::RevocationList;
use crate::types::dto::Credentials;
use crate::types::internal::account::Account;
use crate::types::internal::auth::{DecodedToken, TokenPair, TokenType};

pub async fn register(
    auth_service: &AuthService,
    email: String,
    password: String,
) -> Result<String, Box<dyn std::error::Error>> {
    let account_id = auth_service.register(Credentials::new(email, password)).await?;

    println!("✓ Account registered: {}", account_id);

    Ok(account_id)
}

pub async fn login(
    auth_service: &AuthService,
    email: String,
    password: String,
) -> Result<TokenPair, Box<dyn std::error::Error>> {
    let tokens = auth_service.login(Credentials::new(email, password)).await?;

    println!("access_token:  {}", tokens.access_token);
    println!("refresh_token: {}", tokens.refresh_token);

    Ok(tokens)
}

/// Revoke the given token (access or refresh) on behalf of its subject
pub async fn logout(
    auth_service: &AuthService,
    token_service: &TokenService,
    token: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let decoded = token_service.decode(token)?;

    auth_service.logout(&decoded.identity, &decoded.claims).await?;

    println!("✓ Token {} revoked", decoded.token_id);

    Ok(())
}

/// Resolve an access token to its account
///
/// Refresh tokens and revoked tokens are rejected.
pub async fn whoami(
    auth_service: &AuthService,
    token_service: &TokenService,
    revocations: &dyn RevocationList,
    token: &str,
) -> Result<Account, Box<dyn std::error::Error>> {
    let decoded = authorize_access_token(token_service, revocations, token).await?;

    let account = auth_service.get_self(&decoded.identity).await?;

    println!("id:           {}", account.id);
    println!("email:        {}", account.email);
    println!(
        "display_name: {}",
        account.display_name.as_deref().unwrap_or("-")
    );
    println!("is_admin:     {}", account.is_admin);
    println!("is_valid:     {}", account.is_valid);

    Ok(account)
}

/// Decode an access token and check it against the revocation list
pub async fn authorize_access_token(
    token_service: &TokenService,
    revocations: &dyn RevocationList,
    token: &str,
) -> Result<DecodedToken, AuthError> {
    let decoded = token_service.decode(token)?;

    if decoded.claims.token_type != TokenType::Access {
        return Err(AuthError::invalid_token("not an access token"));
    }

    if revocations.contains(&decoded.token_id).await? {
        return Err(AuthError::invalid_token("token has been revoked"));
    }

    Ok(decoded)
}
