//! Invoice-only endpoints: status transitions and email delivery

use reqwest::Method;

use super::ApiClient;
use crate::error::Result;
use crate::models::InvoiceStatus;
use crate::validation::FieldErrors;

impl ApiClient {
    /// `PATCH /invoices/:id/status/:newStatus`; only PAID and OVERDUE are accepted
    pub async fn update_invoice_status(
        &self,
        token: &str,
        id: i64,
        status: InvoiceStatus,
    ) -> Result<Option<String>> {
        if !status.is_transition_target() {
            let mut errors = FieldErrors::default();
            errors.add("status", "Status can only be set to PAID or OVERDUE");
            return Err(errors.into());
        }
        let path = format!("/invoices/{}/status/{}", id, status);
        let request = self.request(Method::PATCH, &path, Some(token));
        self.send_unit(request).await
    }

    /// `POST /invoices/:id/send-email`
    pub async fn send_invoice_email(&self, token: &str, id: i64) -> Result<Option<String>> {
        let path = format!("/invoices/{}/send-email", id);
        let request = self.request(Method::POST, &path, Some(token));
        self.send_unit(request).await
    }
}
