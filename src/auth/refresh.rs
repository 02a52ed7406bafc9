//! Access token renewal

use crate::auth::jwt::decode_claims;
use crate::auth::models::{Session, SessionError, TokenPair};
use crate::client::ApiClient;
use crate::error::{Error, Result};

/// Renews an expired access token with the session's refresh token
///
/// One attempt per call. A failure marks the session errored, which every
/// consumer treats as signed out.
#[derive(Debug, Clone)]
pub struct TokenRefresher {
    api: ApiClient,
}

impl TokenRefresher {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Refresh now, regardless of expiry
    pub async fn refresh(&self, session: &mut Session) -> Result<()> {
        match self.request_new_tokens(session).await {
            Ok(tokens) => apply_tokens(session, tokens),
            Err(e) => {
                tracing::warn!("Token refresh failed for user {}: {}", session.user_id, e);
                session.mark_errored(SessionError::RefreshAccessTokenError);
                Err(Error::RefreshFailed(e.to_string()))
            }
        }
    }

    /// Refresh only when the access token has expired; errored sessions fail fast
    pub async fn ensure_fresh(&self, session: &mut Session) -> Result<()> {
        if !session.is_valid() {
            return Err(Error::Unauthenticated);
        }
        if session.is_expired() {
            self.refresh(session).await?;
        }
        Ok(())
    }

    async fn request_new_tokens(&self, session: &Session) -> Result<TokenPair> {
        if session.refresh_token.is_empty() {
            return Err(Error::RefreshFailed("no refresh token".to_string()));
        }
        let tokens = self.api.refresh(&session.refresh_token).await?;
        // Decoding up front keeps a bad token from replacing a good one
        let claims = decode_claims(&tokens.access_token)?;
        claims.role()?;
        Ok(tokens)
    }
}

fn apply_tokens(session: &mut Session, tokens: TokenPair) -> Result<()> {
    let claims = decode_claims(&tokens.access_token)?;
    session.role = claims.role()?;
    if let Some(user_id) = claims.user_id() {
        session.user_id = user_id;
    }
    session.access_token_expires_at_epoch_millis = claims.expires_at_millis();
    session.access_token = tokens.access_token;
    if let Some(refresh_token) = tokens.refresh_token {
        session.refresh_token = refresh_token;
    }
    session.error = None;
    tracing::info!("Refreshed access token for user {}", session.user_id);
    Ok(())
}
