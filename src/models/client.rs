//! Client records

use serde::{Deserialize, Serialize};
use std::fmt;

use super::filter::{clean, Filter};
use crate::validation::{check_email, check_required, FieldErrors, Validate};

/// How a client prefers to pay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentPreference {
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "PayPal")]
    PayPal,
    #[serde(rename = "Cash")]
    Cash,
    #[serde(rename = "E-Wallet")]
    EWallet,
}

impl PaymentPreference {
    pub fn label(self) -> &'static str {
        match self {
            PaymentPreference::BankTransfer => "Bank Transfer",
            PaymentPreference::CreditCard => "Credit Card",
            PaymentPreference::PayPal => "PayPal",
            PaymentPreference::Cash => "Cash",
            PaymentPreference::EWallet => "E-Wallet",
        }
    }
}

impl fmt::Display for PaymentPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub payment_preferences: Option<PaymentPreference>,
}

/// Add/edit client form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub payment_preferences: Option<PaymentPreference>,
}

impl From<Client> for ClientForm {
    fn from(client: Client) -> Self {
        Self {
            name: client.name,
            email: client.email,
            address: client.address,
            phone_number: client.phone_number,
            payment_preferences: client.payment_preferences,
        }
    }
}

impl Validate for ClientForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        check_required(&mut errors, "name", &self.name, "Required");
        check_email(&mut errors, "email", &self.email, "Required");
        if self.payment_preferences.is_none() {
            errors.add("paymentPreferences", "Required");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl Filter for ClientFilter {
    fn normalized(self) -> Self {
        Self {
            name: clean(self.name),
            email: clean(self.email),
            phone_number: clean(self.phone_number),
        }
    }
}

impl Validate for ClientFilter {
    fn validate(&self) -> Result<(), FieldErrors> {
        Ok(())
    }
}
