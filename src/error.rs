//! Error types for the invoice admin front end

use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use thiserror::Error;

use crate::auth::guard::{LANDING_PATH, LOGIN_PATH};
use crate::ui::view::{Notification, Screen};
use crate::validation::FieldErrors;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found. Run 'invoice-admin init' first.")]
    ConfigNotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote API returned {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Remote API response had no data")]
    MissingData,

    #[error("Not signed in")]
    Unauthenticated,

    #[error("Not allowed")]
    Forbidden,

    #[error("{0}")]
    LoginRejected(String),

    #[error("Failed to refresh token: {0}")]
    RefreshFailed(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Error::InvalidToken(err.to_string())
    }
}

impl From<FieldErrors> for Error {
    fn from(errors: FieldErrors) -> Self {
        Error::Validation(errors)
    }
}

/// Coarse error categories every failure resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing, expired or undecodable token: back to the login screen
    Authentication,
    /// Valid token but the role is not enough: back to the landing screen
    Authorization,
    /// Client-side form constraint violated, nothing was sent
    Validation,
    /// The remote API answered with a non-2xx status
    Remote,
    /// The request never got a response
    Network,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Unauthenticated
            | Error::InvalidToken(_)
            | Error::RefreshFailed(_)
            | Error::LoginRejected(_) => ErrorKind::Authentication,
            Error::Forbidden => ErrorKind::Authorization,
            Error::Validation(_) => ErrorKind::Validation,
            Error::Remote { .. } | Error::MissingData => ErrorKind::Remote,
            Error::Http(_) => ErrorKind::Network,
            Error::Config(_)
            | Error::ConfigNotFound
            | Error::Io(_)
            | Error::TomlParse(_)
            | Error::Json(_)
            | Error::Yaml(_)
            | Error::Other(_) => ErrorKind::Internal,
        }
    }

    /// Message suitable for a user-facing notification
    pub fn user_message(&self) -> String {
        match self {
            Error::Remote { message, .. } => message.clone(),
            Error::Http(_) => "Could not reach the invoicing service. Please try again.".to_string(),
            Error::MissingData => "The invoicing service returned an empty response".to_string(),
            Error::Validation(_) => "Please fix the highlighted fields".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.kind() {
            ErrorKind::Authentication => {
                tracing::debug!("Redirecting to login: {}", self);
                Redirect::to(LOGIN_PATH).into_response()
            }
            ErrorKind::Authorization => Redirect::to(LANDING_PATH).into_response(),
            ErrorKind::Validation => {
                let message = self.user_message();
                let field_errors = match self {
                    Error::Validation(errors) => errors,
                    _ => FieldErrors::default(),
                };
                let screen = Screen::new("error", ())
                    .with_notification(Notification::error(message))
                    .with_field_errors(field_errors);
                (StatusCode::UNPROCESSABLE_ENTITY, screen).into_response()
            }
            ErrorKind::Remote | ErrorKind::Network => {
                tracing::error!("Remote call failed: {}", self);
                let screen =
                    Screen::new("error", ()).with_notification(Notification::error(self.user_message()));
                (StatusCode::BAD_GATEWAY, screen).into_response()
            }
            ErrorKind::Internal => {
                tracing::error!("Internal error: {}", self);
                let screen =
                    Screen::new("error", ()).with_notification(Notification::error(self.user_message()));
                (StatusCode::INTERNAL_SERVER_ERROR, screen).into_response()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
