//! Home, login, logout and self-registration screens

use axum::{
    extract::{Query, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{form_failure, Notification, Screen};
use crate::api::SharedState;
use crate::auth::cookie::{clear_cookie_header, session_cookie, set_cookie_header};
use crate::auth::guard::LOGIN_PATH;
use crate::auth::{landing_path, Credentials, CurrentUser};
use crate::error::Error;
use crate::models::{RegistrationCompletion, RegistrationRequest};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub signed_in: bool,
    pub links: Vec<Link>,
}

#[derive(Debug, Serialize)]
pub struct Link {
    pub label: &'static str,
    pub href: &'static str,
}

/// Never carries the password back
#[derive(Debug, Serialize)]
pub struct LoginView {
    pub email: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub registered: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterQuery {
    #[serde(default)]
    pub missing_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyQuery {
    #[serde(default)]
    pub verification_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyView {
    pub verification_token: String,
    pub form: RegistrationCompletion,
}

pub async fn home(user: Option<CurrentUser>) -> Screen<HomeView> {
    let links = match &user {
        Some(user) => vec![Link {
            label: "Dashboard",
            href: landing_path(user.role),
        }],
        None => vec![
            Link {
                label: "Register",
                href: "/register",
            },
            Link {
                label: "Login",
                href: LOGIN_PATH,
            },
        ],
    };
    Screen::new(
        "home",
        HomeView {
            signed_in: user.is_some(),
            links,
        },
    )
}

pub async fn login_page(user: Option<CurrentUser>, Query(query): Query<LoginQuery>) -> Response {
    if let Some(user) = user {
        return Redirect::to(landing_path(user.role)).into_response();
    }
    let mut screen = Screen::new(
        "login",
        LoginView {
            email: String::new(),
        },
    );
    if query.registered.is_some() {
        screen = screen.with_notification(Notification::success("Registration success!"));
    }
    screen.into_response()
}

/// Exchange credentials for a session cookie and land by role
///
/// A session this browser already held is ended first.
pub async fn login(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(credentials): Json<Credentials>,
) -> Response {
    state.sessions.purge_errored().await;

    let view = LoginView {
        email: credentials.email.clone(),
    };
    match state.authenticator.login(&credentials).await {
        Ok(session) => {
            if let Some(previous) = session_cookie(&headers, &state.config.session.cookie_name) {
                if state.sessions.delete(&previous).await {
                    tracing::debug!("Replaced the previous session of a signing-in browser");
                }
            }
            let landing = landing_path(session.role);
            let session_id = state.sessions.create(session).await;
            let cookie = set_cookie_header(&state.config.session, &session_id);
            ([(SET_COOKIE, cookie)], Redirect::to(landing)).into_response()
        }
        Err(Error::LoginRejected(message)) => {
            let screen = Screen::new("login", view).with_notification(Notification::error(message));
            (StatusCode::UNAUTHORIZED, screen).into_response()
        }
        Err(e) => form_failure("login", view, e, "Login failed"),
    }
}

/// Drop the session, whatever its state, and clear the cookie
pub async fn logout(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if let Some(session_id) = session_cookie(&headers, &state.config.session.cookie_name) {
        if state.sessions.delete(&session_id).await {
            tracing::info!("Session signed out");
        }
    }
    let cookie = clear_cookie_header(&state.config.session);
    ([(SET_COOKIE, cookie)], Redirect::to(LOGIN_PATH)).into_response()
}

pub async fn register_page(Query(query): Query<RegisterQuery>) -> Screen<RegistrationRequest> {
    let screen = Screen::new("register", RegistrationRequest::default());
    if query.missing_token.is_some() {
        screen.with_notification(Notification::error("Verification token not found!"))
    } else {
        screen
    }
}

/// Ask the API to email a verification link
pub async fn register(
    State(state): State<SharedState>,
    Json(form): Json<RegistrationRequest>,
) -> Response {
    match state.api.request_registration(&form).await {
        Ok(_) => Screen::new("register", RegistrationRequest::default())
            .with_notification(Notification::success(
                "Verification link has been sent to your email!",
            ))
            .into_response(),
        Err(e) => form_failure("register", form, e, "Failed to send verification link"),
    }
}

pub async fn verify_page(Query(query): Query<VerifyQuery>) -> Response {
    match query.verification_token.filter(|t| !t.is_empty()) {
        Some(verification_token) => Screen::new(
            "verify",
            VerifyView {
                verification_token,
                form: RegistrationCompletion::default(),
            },
        )
        .into_response(),
        None => Redirect::to("/register?missingToken=1").into_response(),
    }
}

/// Finish registration with the emailed token
pub async fn verify(
    State(state): State<SharedState>,
    Query(query): Query<VerifyQuery>,
    Json(form): Json<RegistrationCompletion>,
) -> Response {
    let Some(verification_token) = query.verification_token.filter(|t| !t.is_empty()) else {
        return Redirect::to("/register?missingToken=1").into_response();
    };

    match state.api.complete_registration(&verification_token, &form).await {
        Ok(_) => Redirect::to("/login?registered=1").into_response(),
        Err(e) => {
            let form = RegistrationCompletion {
                password: String::new(),
                confirm_password: String::new(),
                ..form
            };
            let view = VerifyView {
                verification_token,
                form,
            };
            form_failure("verify", view, e, "Registration Failed!")
        }
    }
}
