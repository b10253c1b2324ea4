//! Contact page form: validation and the stored submission shape.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{CoreError, FieldErrors};
use crate::types::Timestamp;

/// Source tag recorded for contact page submissions.
pub const SOURCE_CONTACT_PAGE: &str = "contact_page";

/// Status given to new submissions.
pub const STATUS_NEW: &str = "new";

/// Maximum length of the project description.
pub const MAX_DESCRIPTION_LEN: u64 = 1000;

/// Minimum phone length, counting punctuation.
const MIN_PHONE_LEN: usize = 10;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\s\-\+\(\)\.]+$").expect("valid regex"));

fn validate_email_format(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || EMAIL_RE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("email").with_message("Please enter a valid email address".into()))
    }
}

fn validate_phone_format(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || (PHONE_RE.is_match(value) && value.chars().count() >= MIN_PHONE_LEN) {
        Ok(())
    } else {
        Err(ValidationError::new("phone").with_message("Please enter a valid phone number".into()))
    }
}

/// Fields entered on the contact page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    #[validate(length(min = 1, message = "This field is required"))]
    #[serde(default)]
    pub name: String,

    #[validate(
        length(min = 1, message = "This field is required"),
        custom(function = "validate_email_format")
    )]
    #[serde(default)]
    pub email: String,

    #[validate(
        length(min = 1, message = "This field is required"),
        custom(function = "validate_phone_format")
    )]
    #[serde(default)]
    pub phone: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[validate(length(min = 1, message = "This field is required"))]
    #[serde(default)]
    pub project_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_size: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,

    #[validate(length(
        min = 1,
        max = MAX_DESCRIPTION_LEN,
        message = "Please describe your project in 1000 characters or fewer"
    ))]
    #[serde(default)]
    pub project_description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_contact: Option<String>,

    #[serde(default)]
    pub services: Vec<String>,
}

impl ContactForm {
    /// Trim every text field in place.
    pub fn normalize(&mut self) {
        for field in [
            &mut self.name,
            &mut self.email,
            &mut self.phone,
            &mut self.project_type,
            &mut self.project_description,
        ] {
            *field = field.trim().to_string();
        }
    }

    /// Normalize, then check every field. All violations are reported at once.
    pub fn check(&mut self) -> Result<(), CoreError> {
        self.normalize();
        self.validate().map_err(|errors| CoreError::InvalidFields(field_errors(&errors)))
    }
}

/// First message per field, keyed by the stored (camelCase) field name.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, list)| {
            let message = list.first()?.message.as_ref()?.to_string();
            Some((to_camel_case(&field), message))
        })
        .collect()
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Document written to `contact_forms`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    #[serde(flatten)]
    pub form: ContactForm,
    pub source: String,
    pub status: String,
    pub user_agent: Option<String>,
    pub page_url: Option<String>,
    pub timestamp: Timestamp,
}

impl ContactSubmission {
    pub fn new(form: ContactForm, user_agent: Option<String>, page_url: Option<String>) -> Self {
        Self {
            form,
            source: SOURCE_CONTACT_PAGE.to_string(),
            status: STATUS_NEW.to_string(),
            user_agent,
            page_url,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Message shown after a successful submission.
pub const CONTACT_SUCCESS_MESSAGE: &str =
    "Thank you! Your request has been submitted. We'll contact you within 24 hours.";

/// Message shown when the submission could not be stored.
pub fn contact_failure_message(phone: &str) -> String {
    format!("Sorry, there was an error submitting your request. Please call us at {phone}.")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
