//! Route guard
//!
//! Decides, before any screen runs, whether a navigation proceeds, goes to the
//! login screen, or falls back to the standard landing page. The guard only
//! reads sessions; refreshing is left to the first API call a screen makes.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::api::SharedState;
use crate::auth::cookie::session_cookie;
use crate::auth::jwt::decode_claims;
use crate::auth::models::{CurrentUser, Role, Session};
use crate::config::RouteRules;
use crate::error::Error;

pub const LOGIN_PATH: &str = "/login";
pub const LANDING_PATH: &str = "/dashboard";
pub const ADMIN_LANDING_PATH: &str = "/dashboard/admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToLogin,
    RedirectToLanding,
}

/// `/clients` matches `/clients` and `/clients/4`, never `/clientsx`
fn matches_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/'),
        None => false,
    }
}

/// Role read from the session's access token; `None` when unusable
fn token_role(session: &Session) -> Option<Role> {
    if !session.is_valid() {
        return None;
    }
    decode_claims(&session.access_token).ok()?.role().ok()
}

/// Decide what happens to a navigation to `path`
pub fn authorize(rules: &RouteRules, path: &str, session: Option<&Session>) -> GuardDecision {
    if rules.public_paths.iter().any(|p| p == path) {
        return GuardDecision::Allow;
    }

    let admin_only = rules.admin_prefixes.iter().any(|p| matches_prefix(path, p));
    let protected = admin_only || rules.protected_prefixes.iter().any(|p| matches_prefix(path, p));
    if !protected {
        return GuardDecision::Allow;
    }

    let Some(role) = session.and_then(token_role) else {
        return GuardDecision::RedirectToLogin;
    };

    if admin_only && !role.is_admin() {
        return GuardDecision::RedirectToLanding;
    }
    GuardDecision::Allow
}

/// Middleware applying `authorize` to every request
///
/// On `Allow` with a usable session, a `CurrentUser` is attached to the
/// request for handlers to extract.
pub async fn route_guard(
    State(state): State<SharedState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let session_id = session_cookie(request.headers(), &state.config.session.cookie_name);
    let session = match &session_id {
        Some(id) => state.sessions.get(id).await,
        None => None,
    };

    match authorize(&state.config.routes, &path, session.as_ref()) {
        GuardDecision::Allow => {}
        GuardDecision::RedirectToLogin => {
            tracing::debug!("Guard: {} requires a session", path);
            return Redirect::to(LOGIN_PATH).into_response();
        }
        GuardDecision::RedirectToLanding => {
            tracing::debug!("Guard: {} requires the admin role", path);
            return Redirect::to(LANDING_PATH).into_response();
        }
    }

    if let (Some(session_id), Some(session)) = (session_id, session) {
        if let Some(role) = token_role(&session) {
            request.extensions_mut().insert(CurrentUser {
                session_id,
                user_id: session.user_id,
                role,
            });
        }
    }

    next.run(request).await
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(Error::Unauthenticated)
    }
}

impl<S: Send + Sync> OptionalFromRequestParts<S> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<CurrentUser>().cloned())
    }
}
