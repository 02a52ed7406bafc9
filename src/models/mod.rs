//! Records and forms exchanged with the invoicing API

pub mod client;
pub mod filter;
pub mod invoice;
pub mod product;
pub mod user;

pub use client::{Client, ClientFilter, ClientForm, PaymentPreference};
pub use filter::Filter;
pub use invoice::{
    Invoice, InvoiceFilter, InvoiceForm, InvoiceItem, InvoiceItemForm, InvoiceStatus, PaymentTerms,
};
pub use product::{Product, ProductFilter, ProductForm};
pub use user::{Profile, RegistrationCompletion, RegistrationRequest};
