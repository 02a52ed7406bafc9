//! Invoice-specific screens: create form with live total, detail, status and email

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;

use super::crud::FormView;
use super::{form_failure, redirect_with_flash, Notification, Screen};
use crate::api::{AppState, SharedState};
use crate::auth::CurrentUser;
use crate::client::{Clients, Invoices, Products};
use crate::error::{ErrorKind, Result};
use crate::models::product::selectable;
use crate::models::{
    Client, ClientFilter, Invoice, InvoiceForm, InvoiceStatus, Product, ProductFilter,
};

const INVOICES_PATH: &str = "/invoices";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFormView {
    pub form: InvoiceForm,
    pub clients: Vec<Client>,
    /// Soft-deleted products are never offered
    pub products: Vec<Product>,
    pub preview_total: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewView {
    pub preview_total: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetailView {
    pub invoice: Invoice,
    pub items_total: Decimal,
    pub consistent: bool,
    /// Statuses the invoice may still be moved to
    pub transitions: Vec<InvoiceStatus>,
}

impl From<Invoice> for InvoiceDetailView {
    fn from(invoice: Invoice) -> Self {
        let transitions = [InvoiceStatus::Paid, InvoiceStatus::Overdue]
            .into_iter()
            .filter(|s| *s != invoice.status)
            .collect();
        Self {
            items_total: invoice.items_total(),
            consistent: invoice.is_consistent(),
            transitions,
            invoice,
        }
    }
}

fn detail_path(id: i64) -> String {
    format!("{}/{}", INVOICES_PATH, id)
}

async fn selectable_products(state: &AppState, token: &str) -> Result<Vec<Product>> {
    let products = state
        .api
        .list::<Products>(token, &ProductFilter::default())
        .await?;
    Ok(selectable(products))
}

/// `GET /invoices/form`
pub async fn form_page(State(state): State<SharedState>, user: CurrentUser) -> Result<Response> {
    let token = state.sessions.access_token(&user.session_id).await?;
    let client_filter = ClientFilter::default();
    let (clients, products) = tokio::try_join!(
        state.api.list::<Clients>(&token, &client_filter),
        selectable_products(&state, &token),
    )?;

    let form = InvoiceForm::default();
    let view = InvoiceFormView {
        preview_total: form.preview_total(&products)?,
        form,
        clients,
        products,
    };
    Ok(Screen::new("invoices-form", view).into_response())
}

/// `POST /invoices/form/preview`: running total for a form being edited
pub async fn preview(
    State(state): State<SharedState>,
    user: CurrentUser,
    Json(form): Json<InvoiceForm>,
) -> Result<Screen<PreviewView>> {
    let token = state.sessions.access_token(&user.session_id).await?;
    let products = selectable_products(&state, &token).await?;
    Ok(Screen::new(
        "invoices-preview",
        PreviewView {
            preview_total: form.preview_total(&products)?,
        },
    ))
}

/// `POST /invoices/form`; an invalid form never reaches the API
pub async fn submit(
    State(state): State<SharedState>,
    user: CurrentUser,
    Json(form): Json<InvoiceForm>,
) -> Result<Response> {
    let token = state.sessions.access_token(&user.session_id).await?;
    match state.api.create::<Invoices>(&token, &form).await {
        Ok(_) => {
            tracing::info!("Invoice created for client {:?}", form.client_id);
            let notification = Notification::success("Invoice created successfully!");
            Ok(redirect_with_flash(&state, &user, INVOICES_PATH, notification).await)
        }
        Err(e) => {
            let view = FormView { id: None, form };
            Ok(form_failure("invoices-form", view, e, "Failed to create invoice"))
        }
    }
}

/// `GET /invoices/{id}`; a missing or unreadable invoice sends the user back to the list
pub async fn detail(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Response> {
    let token = state.sessions.access_token(&user.session_id).await?;
    match state.api.fetch::<Invoices>(&token, id).await {
        Ok(invoice) => {
            let flash = state.sessions.take_flash(&user.session_id).await;
            Ok(Screen::new("invoice", InvoiceDetailView::from(invoice))
                .with_flash(flash)
                .into_response())
        }
        Err(e) if e.kind() == ErrorKind::Authentication => Err(e),
        Err(e) => {
            tracing::error!("Failed to load invoice {}: {}", id, e);
            let notification = Notification::error(e.user_message());
            Ok(redirect_with_flash(&state, &user, INVOICES_PATH, notification).await)
        }
    }
}

/// `POST /invoices/{id}/status/{status}`
pub async fn update_status(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path((id, status)): Path<(i64, String)>,
) -> Result<Response> {
    let token = state.sessions.access_token(&user.session_id).await?;

    let result = match status.parse::<InvoiceStatus>() {
        Ok(status) => state
            .api
            .update_invoice_status(&token, id, status)
            .await
            .map(|_| status),
        Err(e) => Err(e),
    };

    let notification = match result {
        Ok(status) => {
            tracing::info!("Invoice {} marked {}", id, status);
            Notification::success(format!("Invoice marked as {}", status))
        }
        Err(e) if e.kind() == ErrorKind::Authentication => return Err(e),
        Err(e) => {
            tracing::error!("Failed to update invoice {} status: {}", id, e);
            Notification::error("Failed to update invoice status")
        }
    };
    Ok(redirect_with_flash(&state, &user, &detail_path(id), notification).await)
}

/// `POST /invoices/{id}/send-email`
pub async fn send_email(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Response> {
    let token = state.sessions.access_token(&user.session_id).await?;

    let notification = match state.api.send_invoice_email(&token, id).await {
        Ok(message) => Notification::success(
            message.unwrap_or_else(|| "Invoice sent to client's email".to_string()),
        ),
        Err(e) if e.kind() == ErrorKind::Authentication => return Err(e),
        Err(e) => {
            tracing::error!("Failed to send invoice {}: {}", id, e);
            Notification::error("Failed to send invoice email")
        }
    };
    Ok(redirect_with_flash(&state, &user, &detail_path(id), notification).await)
}
