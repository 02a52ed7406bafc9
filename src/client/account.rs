//! Auth, registration and profile endpoints

use reqwest::Method;

use super::ApiClient;
use crate::auth::models::{Credentials, TokenPair};
use crate::error::{Error, Result};
use crate::models::{Profile, RegistrationCompletion, RegistrationRequest};
use crate::validation::Validate;

impl ApiClient {
    /// `POST /auth/login`
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenPair> {
        let request = self
            .request(Method::POST, "/auth/login", None)
            .json(credentials);
        self.send_data(request).await
    }

    /// `POST /auth/refresh` with the refresh token as bearer
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let request = self.request(Method::POST, "/auth/refresh", Some(refresh_token));
        self.send_data(request).await
    }

    /// `POST /user/register/request`
    pub async fn request_registration(&self, form: &RegistrationRequest) -> Result<Option<String>> {
        form.validate()?;
        let request = self
            .request(Method::POST, "/user/register/request", None)
            .json(form);
        self.send_unit(request).await
    }

    /// `PUT /user/register/complete?verificationToken=...`
    pub async fn complete_registration(
        &self,
        verification_token: &str,
        form: &RegistrationCompletion,
    ) -> Result<Option<String>> {
        form.validate()?;
        let query = serde_urlencoded::to_string([("verificationToken", verification_token)])
            .map_err(|e| Error::Other(e.to_string()))?;
        let request = self
            .request_with_query(Method::PUT, "/user/register/complete", &query, None)
            .json(form);
        self.send_unit(request).await
    }

    /// `GET /user/profile`
    pub async fn profile(&self, token: &str) -> Result<Profile> {
        let request = self.request(Method::GET, "/user/profile", Some(token));
        self.send_data(request).await
    }

    /// `PUT /user/profile`
    pub async fn update_profile(&self, token: &str, profile: &Profile) -> Result<Option<String>> {
        profile.validate()?;
        let request = self
            .request(Method::PUT, "/user/profile", Some(token))
            .json(profile);
        self.send_unit(request).await
    }
}
