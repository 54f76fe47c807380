//! Contact form submissions and their validation rules.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::email::is_valid_email;

/// Minimum length of the message body, counted after trimming.
pub const MIN_MESSAGE_CHARS: usize = 10;

/// A contact form as submitted by a visitor.
///
/// Missing fields deserialize as empty strings so that validation, not
/// parsing, reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactForm {
    pub full_name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// A successfully submitted contact message.
///
/// Immutable once stored; `created_at` is assigned when the submission
/// completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub full_name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl ContactMessage {
    /// Stamp a form with its submission time.
    #[must_use]
    pub fn from_form(form: ContactForm, created_at: DateTime<Utc>) -> Self {
        Self {
            full_name: form.full_name,
            email: form.email,
            subject: form.subject,
            message: form.message,
            created_at,
        }
    }
}

/// Field of the contact form that can carry a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContactField {
    FullName,
    Email,
    Subject,
    Message,
}

impl ContactField {
    /// Key used for this field in error maps and JSON.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
        }
    }
}

impl std::fmt::Display for ContactField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Outcome of [`validate_contact_form`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    pub field_errors: BTreeMap<ContactField, String>,
}

impl ValidationResult {
    fn from_errors(field_errors: BTreeMap<ContactField, String>) -> Self {
        Self {
            valid: field_errors.is_empty(),
            field_errors,
        }
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Error message for `field`, if it failed validation.
    #[must_use]
    pub fn error(&self, field: ContactField) -> Option<&str> {
        self.field_errors.get(&field).map(String::as_str)
    }

    /// First error in field order, used where only one message fits.
    #[must_use]
    pub fn first_error(&self) -> Option<&str> {
        self.field_errors.values().next().map(String::as_str)
    }
}

/// Validate a contact form.
///
/// Every rule is evaluated independently so several fields can fail at once:
///
/// - `fullName`: required
/// - `email`: required, then must look like `local@domain.tld`
/// - `subject`: required
/// - `message`: required, then at least [`MIN_MESSAGE_CHARS`] characters
///
/// "Required" means non-empty after trimming. Minimum lengths for the name
/// and subject are a presentation-layer concern and are not checked here.
#[must_use]
pub fn validate_contact_form(form: &ContactForm) -> ValidationResult {
    let mut errors = BTreeMap::new();

    if form.full_name.trim().is_empty() {
        errors.insert(ContactField::FullName, "Full name is required".to_string());
    }

    if form.email.trim().is_empty() {
        errors.insert(ContactField::Email, "Email is required".to_string());
    } else if !is_valid_email(&form.email) {
        errors.insert(ContactField::Email, "Invalid email format".to_string());
    }

    if form.subject.trim().is_empty() {
        errors.insert(ContactField::Subject, "Subject is required".to_string());
    }

    let message = form.message.trim();
    if message.is_empty() {
        errors.insert(ContactField::Message, "Message is required".to_string());
    } else if message.chars().count() < MIN_MESSAGE_CHARS {
        errors.insert(
            ContactField::Message,
            format!("Message must be at least {MIN_MESSAGE_CHARS} characters"),
        );
    }

    ValidationResult::from_errors(errors)
}
