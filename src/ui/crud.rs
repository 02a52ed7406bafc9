//! Generic list and form screens shared by clients, products and invoices

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{form_failure, redirect_with_flash, Notification, Screen};
use crate::api::SharedState;
use crate::auth::CurrentUser;
use crate::client::{Editable, Resource};
use crate::error::{ErrorKind, Result};
use crate::models::Filter;

#[derive(Debug, Serialize)]
pub struct ListView<R, F> {
    pub records: Vec<R>,
    pub filter: F,
}

#[derive(Debug, Serialize)]
pub struct FormView<F> {
    pub id: Option<i64>,
    pub form: F,
}

#[derive(Debug, Default, Deserialize)]
pub struct FormQuery {
    #[serde(default)]
    pub id: Option<i64>,
}

fn list_screen<R: Resource>() -> String {
    R::NAME.to_string()
}

fn form_screen<R: Resource>() -> String {
    format!("{}-form", R::NAME)
}

/// `GET /<collection>?<filter>`
///
/// Takes a search ticket before calling the API. If another search on the
/// same screen started meanwhile, this response is stale and answers 409
/// without data.
pub async fn list<R: Resource>(
    State(state): State<SharedState>,
    user: CurrentUser,
    Query(filter): Query<R::Filter>,
) -> Result<Response> {
    let filter = filter.normalized();
    let query = filter.to_query()?;

    let ticket = state.sessions.begin_search(&user.session_id, R::NAME).await;
    let token = state.sessions.access_token(&user.session_id).await?;
    let records = state.api.list::<R>(&token, &filter).await;

    if !state
        .sessions
        .is_latest_search(&user.session_id, R::NAME, ticket)
        .await
    {
        tracing::debug!("Discarding superseded {} search #{}", R::NAME, ticket);
        let screen = Screen::<ListView<R::Record, R::Filter>>::empty(list_screen::<R>())
            .with_query(query)
            .with_notification(Notification::info("A newer search replaced this one"))
            .stale();
        return Ok((StatusCode::CONFLICT, screen).into_response());
    }

    let records = records?;
    let flash = state.sessions.take_flash(&user.session_id).await;
    Ok(Screen::new(list_screen::<R>(), ListView { records, filter })
        .with_query(query)
        .with_flash(flash)
        .into_response())
}

/// `GET /<collection>/reset`: back to the unfiltered list
pub async fn reset<R: Resource>() -> Redirect {
    Redirect::to(R::PATH)
}

/// `GET /<collection>/form[?id=]`: blank form, or the record's current values
pub async fn form_page<R: Editable>(
    State(state): State<SharedState>,
    user: CurrentUser,
    Query(query): Query<FormQuery>,
) -> Result<Response> {
    let Some(id) = query.id else {
        let view = FormView {
            id: None,
            form: R::Form::default(),
        };
        return Ok(Screen::new(form_screen::<R>(), view).into_response());
    };

    let token = state.sessions.access_token(&user.session_id).await?;
    match state.api.fetch::<R>(&token, id).await {
        Ok(record) => {
            let view = FormView {
                id: Some(id),
                form: R::to_form(record),
            };
            Ok(Screen::new(form_screen::<R>(), view).into_response())
        }
        Err(e) if e.kind() == ErrorKind::Authentication => Err(e),
        Err(e) => {
            tracing::error!("Failed to load {} {}: {}", R::NAME, id, e);
            let message = format!("Failed to load {}", R::LABEL.to_lowercase());
            Ok(redirect_with_flash(&state, &user, R::PATH, Notification::error(message)).await)
        }
    }
}

/// `POST /<collection>/form[?id=]`: create, or update when `id` is given
pub async fn submit<R: Editable>(
    State(state): State<SharedState>,
    user: CurrentUser,
    Query(query): Query<FormQuery>,
    Json(form): Json<R::Form>,
) -> Result<Response> {
    let token = state.sessions.access_token(&user.session_id).await?;

    let (result, verb) = match query.id {
        Some(id) => (state.api.update::<R>(&token, id, &form).await, "updated"),
        None => (state.api.create::<R>(&token, &form).await, "added"),
    };

    match result {
        Ok(_) => {
            let message = format!("{} {} successfully", R::LABEL, verb);
            Ok(redirect_with_flash(&state, &user, R::PATH, Notification::success(message)).await)
        }
        Err(e) => {
            let fallback = format!("Failed to save {}. Please try again.", R::LABEL.to_lowercase());
            let view = FormView { id: query.id, form };
            Ok(form_failure(&form_screen::<R>(), view, e, &fallback))
        }
    }
}

/// `POST /<collection>/{id}/delete`
pub async fn delete<R: Editable>(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Response> {
    let token = state.sessions.access_token(&user.session_id).await?;

    let notification = match state.api.delete::<R>(&token, id).await {
        Ok(_) => {
            tracing::info!("Deleted {} {}", R::NAME, id);
            Notification::success(format!("{} deleted successfully", R::LABEL))
        }
        Err(e) if e.kind() == ErrorKind::Authentication => return Err(e),
        Err(e) => {
            tracing::error!("Failed to delete {} {}: {}", R::NAME, id, e);
            Notification::error(format!("Failed to delete {}", R::LABEL.to_lowercase()))
        }
    };
    Ok(redirect_with_flash(&state, &user, R::PATH, notification).await)
}
