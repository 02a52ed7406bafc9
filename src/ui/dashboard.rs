//! Read-only dashboards

use axum::extract::State;
use rust_decimal::Decimal;
use serde::Serialize;

use super::Screen;
use crate::api::SharedState;
use crate::auth::CurrentUser;
use crate::client::{Clients, Invoices};
use crate::error::{Error, Result};
use crate::models::{ClientFilter, Invoice, InvoiceFilter, InvoiceStatus};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub invoice_count: usize,
    pub paid_count: usize,
    /// Invoices still waiting for payment, PENDING or OVERDUE
    pub unpaid_count: usize,
    /// Sum of PAID invoices
    pub revenue: Decimal,
    pub client_count: usize,
}

impl DashboardStats {
    pub fn from_records(invoices: &[Invoice], client_count: usize) -> Self {
        let paid = || invoices.iter().filter(|i| i.status == InvoiceStatus::Paid);
        Self {
            invoice_count: invoices.len(),
            paid_count: paid().count(),
            unpaid_count: invoices.len() - paid().count(),
            revenue: paid().map(|i| i.total_amount).sum(),
            client_count,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_clients: usize,
    pub total_invoices: usize,
    pub total_revenue: Decimal,
}

impl From<DashboardStats> for AdminStats {
    fn from(stats: DashboardStats) -> Self {
        Self {
            total_clients: stats.client_count,
            total_invoices: stats.invoice_count,
            total_revenue: stats.revenue,
        }
    }
}

async fn collect_stats(state: &SharedState, user: &CurrentUser) -> Result<DashboardStats> {
    let token = state.sessions.access_token(&user.session_id).await?;
    let (invoice_filter, client_filter) = (InvoiceFilter::default(), ClientFilter::default());
    let (invoices, clients) = tokio::try_join!(
        state.api.list::<Invoices>(&token, &invoice_filter),
        state.api.list::<Clients>(&token, &client_filter),
    )?;
    Ok(DashboardStats::from_records(&invoices, clients.len()))
}

/// `GET /dashboard`
pub async fn dashboard(
    State(state): State<SharedState>,
    user: CurrentUser,
) -> Result<Screen<DashboardStats>> {
    let stats = collect_stats(&state, &user).await?;
    let flash = state.sessions.take_flash(&user.session_id).await;
    Ok(Screen::new("dashboard", stats).with_flash(flash))
}

/// `GET /dashboard/admin`
pub async fn admin_dashboard(
    State(state): State<SharedState>,
    user: CurrentUser,
) -> Result<Screen<AdminStats>> {
    if !user.role.is_admin() {
        return Err(Error::Forbidden);
    }
    let stats = collect_stats(&state, &user).await?;
    let flash = state.sessions.take_flash(&user.session_id).await;
    Ok(Screen::new("admin-dashboard", AdminStats::from(stats)).with_flash(flash))
}
