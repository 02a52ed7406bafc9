//! Authentication models

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::validation::{check_email, check_required, FieldErrors, Validate};

/// Coarse authorization tag carried in the access token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Administrator - may open admin-only screens
    Admin,
    /// Regular user
    User,
}

impl Role {
    /// Anything other than the exact `ADMIN` tag is a regular user
    pub fn from_claim(value: &str) -> Self {
        if value == "ADMIN" {
            Role::Admin
        } else {
            Role::User
        }
    }

    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "ADMIN"),
            Role::User => write!(f, "USER"),
        }
    }
}

/// Why a session stopped being usable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionError {
    RefreshAccessTokenError,
}

/// Access/refresh pair as returned by the login and refresh endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// A signed-in user's tokens plus what was read from them
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub role: Role,
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_expires_at_epoch_millis: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SessionError>,
}

impl Session {
    pub fn is_expired_at(&self, now_millis: i64) -> bool {
        now_millis > self.access_token_expires_at_epoch_millis
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(chrono::Utc::now().timestamp_millis())
    }

    /// An errored session counts as no session at all
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    pub fn mark_errored(&mut self, error: SessionError) {
        self.error = Some(error);
    }
}

/// Login credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Validate for Credentials {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        check_email(&mut errors, "email", &self.email, "Email is required");
        check_required(&mut errors, "password", &self.password, "Password is required");
        errors.into_result()
    }
}

/// What the route guard hands to screens about the signed-in user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    #[serde(skip)]
    pub session_id: String,
    pub user_id: String,
    pub role: Role,
}
