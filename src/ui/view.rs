//! View models every screen answers with

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::validation::FieldErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

/// A dismissible message shown on top of a screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }
}

/// Envelope for one rendered screen
///
/// `query` echoes the canonical filter string of list screens. `stale` is set
/// when a newer search on the same screen superseded this one.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Screen<T> {
    pub screen: String,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
    #[serde(skip_serializing_if = "FieldErrors::is_empty")]
    pub field_errors: FieldErrors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stale: bool,
}

impl<T> Screen<T> {
    pub fn new(screen: impl Into<String>, data: T) -> Self {
        Self {
            data: Some(data),
            ..Self::empty(screen)
        }
    }

    /// A screen with nothing to show, e.g. a superseded search
    pub fn empty(screen: impl Into<String>) -> Self {
        Self {
            screen: screen.into(),
            data: None,
            notification: None,
            field_errors: FieldErrors::default(),
            query: None,
            stale: false,
        }
    }

    pub fn with_notification(mut self, notification: Notification) -> Self {
        self.notification = Some(notification);
        self
    }

    /// Show a pending flash unless the screen already carries a notification
    pub fn with_flash(mut self, flash: Option<Notification>) -> Self {
        if self.notification.is_none() {
            self.notification = flash;
        }
        self
    }

    pub fn with_field_errors(mut self, field_errors: FieldErrors) -> Self {
        self.field_errors = field_errors;
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn stale(mut self) -> Self {
        self.stale = true;
        self
    }
}

impl<T: Serialize> IntoResponse for Screen<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
