//! Generic list/detail/create/update/delete over the API's collections
//!
//! Clients, products and invoices share one fetch/validate/submit contract;
//! a marker type per collection plugs its record, form and filter types in.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::ApiClient;
use crate::error::Result;
use crate::models::{
    Client, ClientFilter, ClientForm, Filter, Invoice, InvoiceFilter, InvoiceForm, Product,
    ProductFilter, ProductForm,
};
use crate::validation::Validate;

/// A collection served under `PATH` with list, detail and create
pub trait Resource: Send + Sync + 'static {
    /// Screen name, also used as the search-sequencing key
    const NAME: &'static str;
    /// Collection path on the remote API and on the front end
    const PATH: &'static str;
    /// Human label for notifications ("Client", "Product")
    const LABEL: &'static str;

    type Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;
    type Form: Serialize + DeserializeOwned + Validate + Default + Clone + Send + Sync + 'static;
    type Filter: Filter + Validate;
}

/// Collections that also accept PUT and DELETE
pub trait Editable: Resource {
    fn to_form(record: Self::Record) -> Self::Form;
}

pub struct Clients;
pub struct Products;
pub struct Invoices;

impl Resource for Clients {
    const NAME: &'static str = "clients";
    const PATH: &'static str = "/clients";
    const LABEL: &'static str = "Client";
    type Record = Client;
    type Form = ClientForm;
    type Filter = ClientFilter;
}

impl Editable for Clients {
    fn to_form(record: Client) -> ClientForm {
        record.into()
    }
}

impl Resource for Products {
    const NAME: &'static str = "products";
    const PATH: &'static str = "/products";
    const LABEL: &'static str = "Product";
    type Record = Product;
    type Form = ProductForm;
    type Filter = ProductFilter;
}

impl Editable for Products {
    fn to_form(record: Product) -> ProductForm {
        record.into()
    }
}

impl Resource for Invoices {
    const NAME: &'static str = "invoices";
    const PATH: &'static str = "/invoices";
    const LABEL: &'static str = "Invoice";
    type Record = Invoice;
    type Form = InvoiceForm;
    type Filter = InvoiceFilter;
}

fn item_path<R: Resource>(id: i64) -> String {
    format!("{}/{}", R::PATH, id)
}

impl ApiClient {
    /// `GET /<collection>?<filter>`
    pub async fn list<R: Resource>(&self, token: &str, filter: &R::Filter) -> Result<Vec<R::Record>> {
        filter.validate()?;
        let query = filter.to_query()?;
        let request = self.request_with_query(Method::GET, R::PATH, &query, Some(token));
        let records = self.send_envelope::<Vec<R::Record>>(request).await?.data;
        Ok(records.unwrap_or_default())
    }

    /// `GET /<collection>/<id>`
    pub async fn fetch<R: Resource>(&self, token: &str, id: i64) -> Result<R::Record> {
        let request = self.request(Method::GET, &item_path::<R>(id), Some(token));
        self.send_data(request).await
    }

    /// `POST /<collection>`; the form is validated first and nothing is sent if it fails
    pub async fn create<R: Resource>(&self, token: &str, form: &R::Form) -> Result<Option<String>> {
        form.validate()?;
        let request = self.request(Method::POST, R::PATH, Some(token)).json(form);
        self.send_unit(request).await
    }

    /// `PUT /<collection>/<id>`, validated like `create`
    pub async fn update<R: Editable>(
        &self,
        token: &str,
        id: i64,
        form: &R::Form,
    ) -> Result<Option<String>> {
        form.validate()?;
        let request = self
            .request(Method::PUT, &item_path::<R>(id), Some(token))
            .json(form);
        self.send_unit(request).await
    }

    /// `DELETE /<collection>/<id>`
    pub async fn delete<R: Editable>(&self, token: &str, id: i64) -> Result<Option<String>> {
        let request = self.request(Method::DELETE, &item_path::<R>(id), Some(token));
        self.send_unit(request).await
    }
}
