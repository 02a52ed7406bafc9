//! The signed-in user's own profile

use axum::{extract::State, response::Response, Json};

use super::{form_failure, redirect_with_flash, Notification, Screen};
use crate::api::SharedState;
use crate::auth::CurrentUser;
use crate::error::Result;
use crate::models::Profile;

const PROFILE_PATH: &str = "/profile";

pub async fn profile_page(
    State(state): State<SharedState>,
    user: CurrentUser,
) -> Result<Screen<Profile>> {
    let token = state.sessions.access_token(&user.session_id).await?;
    let profile = state.api.profile(&token).await?;
    let flash = state.sessions.take_flash(&user.session_id).await;
    Ok(Screen::new("profile", profile).with_flash(flash))
}

pub async fn update_profile(
    State(state): State<SharedState>,
    user: CurrentUser,
    Json(profile): Json<Profile>,
) -> Result<Response> {
    let token = state.sessions.access_token(&user.session_id).await?;
    match state.api.update_profile(&token, &profile).await {
        Ok(_) => {
            let notification = Notification::success("Profile updated successfully");
            Ok(redirect_with_flash(&state, &user, PROFILE_PATH, notification).await)
        }
        Err(e) => Ok(form_failure("profile", profile, e, "Failed to update profile")),
    }
}
