//! Credential exchange: email/password in, session out

use crate::auth::guard::{ADMIN_LANDING_PATH, LANDING_PATH};
use crate::auth::jwt::decode_claims;
use crate::auth::models::{Credentials, Role, Session, TokenPair};
use crate::client::ApiClient;
use crate::error::{Error, Result};
use crate::validation::Validate;

const LOGIN_FAILED: &str = "Login failed";

/// Build a session from a freshly issued token pair
pub fn session_from_tokens(tokens: TokenPair) -> Result<Session> {
    if tokens.access_token.is_empty() {
        return Err(Error::LoginRejected(LOGIN_FAILED.to_string()));
    }
    let claims = decode_claims(&tokens.access_token)?;
    let role = claims.role()?;
    let user_id = claims
        .user_id()
        .ok_or_else(|| Error::InvalidToken("token carries no user id".to_string()))?;

    Ok(Session {
        user_id,
        role,
        access_token_expires_at_epoch_millis: claims.expires_at_millis(),
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token.unwrap_or_default(),
        error: None,
    })
}

/// Where a freshly signed-in user lands
pub fn landing_path(role: Role) -> &'static str {
    if role.is_admin() {
        ADMIN_LANDING_PATH
    } else {
        LANDING_PATH
    }
}

#[derive(Debug, Clone)]
pub struct Authenticator {
    api: ApiClient,
}

impl Authenticator {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Exchange credentials for a session
    ///
    /// A rejected login or a response without an access token yields
    /// `Error::LoginRejected`; no session is created in either case.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        credentials.validate()?;

        let tokens = match self.api.login(credentials).await {
            Ok(tokens) => tokens,
            Err(Error::Remote { status, message }) => {
                tracing::warn!("Login rejected for {} ({})", credentials.email, status);
                return Err(Error::LoginRejected(message));
            }
            Err(Error::MissingData) | Err(Error::Json(_)) => {
                tracing::warn!("Login response for {} had no token", credentials.email);
                return Err(Error::LoginRejected(LOGIN_FAILED.to_string()));
            }
            Err(e) => return Err(e),
        };

        let session = session_from_tokens(tokens)?;
        tracing::info!("User {} signed in as {}", session.user_id, session.role);
        Ok(session)
    }
}
