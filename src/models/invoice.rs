//! Invoice records, the create form and its preview total

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::filter::{clean, Filter};
use super::product::Product;
use crate::error::Error;
use crate::validation::{FieldErrors, Validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "PENDING",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Overdue => "OVERDUE",
        }
    }

    /// Only PAID and OVERDUE can be set by hand
    pub fn is_transition_target(self) -> bool {
        matches!(self, InvoiceStatus::Paid | InvoiceStatus::Overdue)
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(InvoiceStatus::Pending),
            "PAID" => Ok(InvoiceStatus::Paid),
            "OVERDUE" => Ok(InvoiceStatus::Overdue),
            other => Err(Error::Other(format!("Unknown invoice status: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentTerms {
    #[default]
    Today,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub product_name: Option<String>,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

impl InvoiceItem {
    /// unit price × quantity
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: i64,
    pub invoice_number: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    #[serde(default)]
    pub payment_terms: Option<PaymentTerms>,
    pub total_amount: Decimal,
    #[serde(default)]
    pub client_id: Option<i64>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub client_email: Option<String>,
    #[serde(default)]
    pub client_address: Option<String>,
    #[serde(default)]
    pub items: Vec<InvoiceItem>,
}

impl Invoice {
    /// Sum of the items' subtotals
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(InvoiceItem::subtotal).sum()
    }

    /// Whether the server-computed figures match the items (display check only)
    pub fn is_consistent(&self) -> bool {
        self.items.iter().all(|i| i.total_price == i.subtotal())
            && self.total_amount == self.items_total()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItemForm {
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

impl Default for InvoiceItemForm {
    fn default() -> Self {
        Self {
            product_id: None,
            quantity: default_quantity(),
        }
    }
}

/// Create-invoice form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceForm {
    #[serde(default)]
    pub client_id: Option<i64>,
    #[serde(default)]
    pub payment_terms: PaymentTerms,
    #[serde(default)]
    pub items: Vec<InvoiceItemForm>,
}

impl Default for InvoiceForm {
    /// A fresh form starts with one empty line
    fn default() -> Self {
        Self {
            client_id: None,
            payment_terms: PaymentTerms::default(),
            items: vec![InvoiceItemForm::default()],
        }
    }
}

impl InvoiceForm {
    /// Running total shown while editing; unknown products count as zero
    ///
    /// Quantities are whatever the user typed, so an overflowing total is a
    /// field error on `items` rather than a panic.
    pub fn preview_total(&self, products: &[Product]) -> Result<Decimal, FieldErrors> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |total, item| {
                let price = item
                    .product_id
                    .and_then(|id| products.iter().find(|p| p.id == id && !p.deleted))
                    .map(|p| p.price)
                    .unwrap_or(Decimal::ZERO);
                price
                    .checked_mul(Decimal::from(item.quantity.max(0)))
                    .and_then(|line| total.checked_add(line))
            })
            .ok_or_else(|| {
                let mut errors = FieldErrors::default();
                errors.add("items", "Total is too large");
                errors
            })
    }
}

impl Validate for InvoiceForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if self.client_id.is_none() {
            errors.add("clientId", "Client is required");
        }
        if self.items.is_empty() {
            errors.add("items", "At least one item is required");
        }
        for (index, item) in self.items.iter().enumerate() {
            if item.product_id.is_none() {
                errors.add(format!("items[{}].productId", index), "Product is required");
            }
            if item.quantity < 1 {
                errors.add(format!("items[{}].quantity", index), "Min 1");
            }
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Filter for InvoiceFilter {
    fn normalized(self) -> Self {
        Self {
            invoice_number: clean(self.invoice_number),
            client_name: clean(self.client_name),
            date: clean(self.date),
            status: clean(self.status).map(|s| s.to_ascii_uppercase()),
        }
    }
}

impl Validate for InvoiceFilter {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if let Some(date) = clean(self.date.clone()) {
            if NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_err() {
                errors.add("date", "Must be a date (YYYY-MM-DD)");
            }
        }
        if let Some(status) = clean(self.status.clone()) {
            if status.parse::<InvoiceStatus>().is_err() {
                errors.add("status", "Unknown status");
            }
        }
        errors.into_result()
    }
}
