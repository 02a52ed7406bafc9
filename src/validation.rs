//! Form validation shared by the screens and the CLI

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$")
        .expect("Invalid email regex - this is a bug in the codebase")
});

const PASSWORD_MIN_LENGTH: usize = 6;
const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Field name to message, one message per field (first failure wins)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Client-side checks run before any network call
pub trait Validate {
    fn validate(&self) -> Result<(), FieldErrors>;
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value.trim())
}

/// Required + email shape, recording the first failure under `field`
pub fn check_email(errors: &mut FieldErrors, field: &str, value: &str, required_message: &str) {
    if is_blank(value) {
        errors.add(field, required_message);
    } else if !is_valid_email(value) {
        errors.add(field, "Invalid email");
    }
}

pub fn check_required(errors: &mut FieldErrors, field: &str, value: &str, message: &str) {
    if is_blank(value) {
        errors.add(field, message);
    }
}

/// Password composition rules used at registration
pub fn check_password(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.is_empty() {
        errors.add(field, "Password is required!");
    } else if value.chars().count() < PASSWORD_MIN_LENGTH {
        errors.add(field, "Minimum 6 characters");
    } else if !value.chars().any(|c| c.is_ascii_uppercase()) {
        errors.add(field, "Must contain at least one uppercase letter");
    } else if !value.chars().any(|c| c.is_ascii_digit()) {
        errors.add(field, "Must contain at least one number");
    } else if !value.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)) {
        errors.add(field, "Must contain at least one special character");
    }
}
