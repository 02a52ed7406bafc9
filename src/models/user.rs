//! Profile and self-registration

use serde::{Deserialize, Serialize};

use crate::validation::{check_email, check_password, check_required, FieldErrors, Validate};

/// The signed-in user's own profile, also the edit form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl Validate for Profile {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        check_required(&mut errors, "name", &self.name, "Name is required");
        check_email(&mut errors, "email", &self.email, "Email is required");
        errors.into_result()
    }
}

/// First registration step: ask for a verification link
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrationRequest {
    #[serde(default)]
    pub email: String,
}

impl Validate for RegistrationRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        check_email(&mut errors, "email", &self.email, "Email is required");
        errors.into_result()
    }
}

/// Second registration step, submitted with the emailed verification token
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationCompletion {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
    /// Checked locally, never sent
    #[serde(default, skip_serializing)]
    pub confirm_password: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl Validate for RegistrationCompletion {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        check_required(&mut errors, "name", &self.name, "Name is required!");
        check_password(&mut errors, "password", &self.password);
        if self.confirm_password.is_empty() {
            errors.add("confirmPassword", "Password confirmation is required!");
        } else if self.confirm_password != self.password {
            errors.add("confirmPassword", "Password confirmation does not match");
        }
        errors.into_result()
    }
}
