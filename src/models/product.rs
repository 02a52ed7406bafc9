//! Product records

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::filter::{clean, Filter};
use crate::validation::{check_required, FieldErrors, Validate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    /// Soft-delete flag; deleted products stay listed but are never offered for new invoices
    #[serde(default)]
    pub deleted: bool,
}

/// Keep only products that may still be put on an invoice
pub fn selectable(products: Vec<Product>) -> Vec<Product> {
    products.into_iter().filter(|p| !p.deleted).collect()
}

/// Add/edit product form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub deleted: bool,
}

impl From<Product> for ProductForm {
    fn from(product: Product) -> Self {
        Self {
            name: product.name,
            description: product.description,
            price: Some(product.price),
            deleted: product.deleted,
        }
    }
}

impl Validate for ProductForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        check_required(&mut errors, "name", &self.name, "Required");
        match self.price {
            None => errors.add("price", "Required"),
            Some(price) if price.is_sign_negative() && !price.is_zero() => {
                errors.add("price", "Must not be negative")
            }
            Some(_) => {}
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<String>,
}

impl Filter for ProductFilter {
    fn normalized(self) -> Self {
        Self {
            search: clean(self.search),
            min_price: clean(self.min_price),
            max_price: clean(self.max_price),
        }
    }
}

impl Validate for ProductFilter {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        let min = parse_bound(&mut errors, "minPrice", &self.min_price);
        let max = parse_bound(&mut errors, "maxPrice", &self.max_price);
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                errors.add("maxPrice", "Must not be below the minimum price");
            }
        }
        errors.into_result()
    }
}

/// A usable price bound, recording why it is not one
fn parse_bound(errors: &mut FieldErrors, field: &str, value: &Option<String>) -> Option<Decimal> {
    let value = clean(value.clone())?;
    match Decimal::from_str(&value) {
        Ok(price) if price.is_sign_negative() && !price.is_zero() => {
            errors.add(field, "Must not be negative");
            None
        }
        Ok(price) => Some(price),
        Err(_) => {
            errors.add(field, "Must be a number");
            None
        }
    }
}
