//! Screen handlers
//!
//! Each screen answers a JSON `Screen` view model. Notifications raised just
//! before a redirect travel as a one-shot flash stored in the session.

pub mod auth;
pub mod crud;
pub mod dashboard;
pub mod invoices;
pub mod profile;
pub mod view;

pub use view::{Notification, NotificationLevel, Screen};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Serialize;

use crate::api::AppState;
use crate::auth::CurrentUser;
use crate::error::{Error, ErrorKind};

/// Store `notification` for the next screen and redirect there
pub(crate) async fn redirect_with_flash(
    state: &AppState,
    user: &CurrentUser,
    to: &str,
    notification: Notification,
) -> Response {
    state.sessions.push_flash(&user.session_id, notification).await;
    Redirect::to(to).into_response()
}

/// Re-render a form after a failed submit, keeping what the user typed
///
/// Validation failures answer 422 with per-field messages; remote failures
/// answer 502 with the API's message, or `fallback` when it gave none.
/// Authentication failures still go to the login screen.
pub(crate) fn form_failure<T: Serialize>(
    screen: &str,
    data: T,
    err: Error,
    fallback: &str,
) -> Response {
    match err.kind() {
        ErrorKind::Validation => {
            let notification = Notification::error(err.user_message());
            let field_errors = match err {
                Error::Validation(errors) => errors,
                _ => Default::default(),
            };
            let screen = Screen::new(screen, data)
                .with_notification(notification)
                .with_field_errors(field_errors);
            (StatusCode::UNPROCESSABLE_ENTITY, screen).into_response()
        }
        ErrorKind::Remote | ErrorKind::Network => {
            tracing::error!("Submitting {} failed: {}", screen, err);
            let message = match err {
                Error::Remote { message, .. } if !message.is_empty() => message,
                _ => fallback.to_string(),
            };
            let screen = Screen::new(screen, data).with_notification(Notification::error(message));
            (StatusCode::BAD_GATEWAY, screen).into_response()
        }
        _ => err.into_response(),
    }
}
