//! Local validation of create/update payloads.
//!
//! Runs before any request is built. All fields are checked in one pass and
//! the failures are reported per field path (`email`, `name.firstname`, ...).

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::types::{MutateUserRequest, UserName};

pub const USERNAME_MIN_LEN: usize = 3;
pub const PASSWORD_MIN_LEN: usize = 6;

pub const EMAIL_MESSAGE: &str = "Email must be valid.";
pub const USERNAME_MESSAGE: &str = "Username must be at least 3 characters.";
pub const PASSWORD_MESSAGE: &str = "Password must be at least 6 characters.";
pub const FIRSTNAME_MESSAGE: &str = "First name is required.";
pub const LASTNAME_MESSAGE: &str = "Last name is required.";

#[expect(clippy::unwrap_used, reason = "pattern is a compile-time constant")]
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9_'+\-]+(\.[A-Za-z0-9_'+\-]+)*@([A-Za-z0-9]([A-Za-z0-9\-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$",
    )
    .unwrap()
});

/// Field path → message for every field that failed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    fn add(&mut self, field: &str, message: &str) {
        self.0.insert(field.to_owned(), message.to_owned());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Trim every field and check it. On success the trimmed payload is returned
/// and is what gets sent.
pub fn validate(payload: &MutateUserRequest) -> Result<MutateUserRequest, ValidationErrors> {
    let trimmed = MutateUserRequest {
        email: payload.email.trim().to_owned(),
        username: payload.username.trim().to_owned(),
        password: payload.password.trim().to_owned(),
        name: UserName {
            firstname: payload.name.firstname.trim().to_owned(),
            lastname: payload.name.lastname.trim().to_owned(),
        },
    };

    let mut errors = ValidationErrors::default();

    if !is_valid_email(&trimmed.email) {
        errors.add("email", EMAIL_MESSAGE);
    }
    if trimmed.username.chars().count() < USERNAME_MIN_LEN {
        errors.add("username", USERNAME_MESSAGE);
    }
    if trimmed.password.chars().count() < PASSWORD_MIN_LEN {
        errors.add("password", PASSWORD_MESSAGE);
    }
    if trimmed.name.firstname.is_empty() {
        errors.add("name.firstname", FIRSTNAME_MESSAGE);
    }
    if trimmed.name.lastname.is_empty() {
        errors.add("name.lastname", LASTNAME_MESSAGE);
    }

    if errors.is_empty() {
        Ok(trimmed)
    } else {
        Err(errors)
    }
}
