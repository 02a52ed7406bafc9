//! HTTP client for the remote invoicing REST API

pub mod account;
pub mod invoices;
pub mod resource;

pub use resource::{Clients, Editable, Invoices, Products, Resource};

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::models::filter::with_query;

/// Every API answer wraps its payload as `{ "data": ..., "message": ... }`
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub message: Option<String>,
}

/// Thin wrapper around one shared reqwest client
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request builder for `path` (which may carry a query), with an optional bearer token
    pub(crate) fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub(crate) fn request_with_query(
        &self,
        method: Method,
        path: &str,
        query: &str,
        token: Option<&str>,
    ) -> RequestBuilder {
        self.request(method, &with_query(path, query), token)
    }

    /// Send and unwrap the envelope, mapping non-2xx answers to `Error::Remote`
    pub(crate) async fn send_envelope<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Envelope<T>> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<Envelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                });
            return Err(Error::Remote {
                status: status.as_u16(),
                message,
            });
        }

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Envelope {
                data: None,
                message: None,
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }

    /// Send and require a `data` payload
    pub(crate) async fn send_data<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        self.send_envelope::<T>(request)
            .await?
            .data
            .ok_or(Error::MissingData)
    }

    /// Send and ignore any payload; returns the server's message if it sent one
    pub(crate) async fn send_unit(&self, request: RequestBuilder) -> Result<Option<String>> {
        let envelope = self.send_envelope::<serde_json::Value>(request).await?;
        Ok(envelope.message)
    }
}
