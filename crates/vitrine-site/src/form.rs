//! Contact form validation
//!
//! Every submit clears all indicators, then checks each field on its own.
//! Nothing is sent anywhere: a valid submission is logged and the form is
//! reset.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use vitrine_dom::{Document, NodeId};

use crate::{SiteError, SiteResult};

/// Loose shape check: something@something.something, no whitespace.
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern is valid"));

/// Contact form fields, in validation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Phone,
    Message,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Phone, Field::Message];

    /// Control name, control id and `data-field` key
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Message => "message",
        }
    }

    /// Whether a trimmed value passes this field's rule
    pub fn accepts(self, value: &str) -> bool {
        match self {
            Self::Email => !value.is_empty() && EMAIL_PATTERN.is_match(value),
            Self::Name | Self::Phone | Self::Message => !value.is_empty(),
        }
    }
}

/// Captured values of a valid submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

/// Outcome of one submit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Failing fields, in field order
    pub invalid: Vec<Field>,
    /// Present only when every field passed
    pub submission: Option<ContactSubmission>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.invalid.is_empty()
    }
}

/// Validator bound to `#contactForm`
#[derive(Debug, Clone, Copy)]
pub struct FormValidator {
    form: NodeId,
    success: NodeId,
}

impl FormValidator {
    pub fn new(doc: &Document) -> SiteResult<Self> {
        Ok(Self {
            form: doc
                .get_element_by_id("contactForm")
                .ok_or_else(|| SiteError::missing("#contactForm"))?,
            success: doc
                .get_element_by_id("formSuccess")
                .ok_or_else(|| SiteError::missing("#formSuccess"))?,
        })
    }

    pub fn form(&self) -> NodeId {
        self.form
    }

    fn read(&self, doc: &Document, field: Field) -> SiteResult<String> {
        doc.form_value(self.form, field.as_str())
            .map(|v| v.trim().to_string())
            .ok_or_else(|| SiteError::missing(format!("[name=\"{}\"]", field.as_str())))
    }

    fn clear_indicators(&self, doc: &mut Document) -> SiteResult<()> {
        for el in doc.get_elements_by_class_name("form-error") {
            doc.remove_class(el, "show")?;
        }
        for el in doc.get_elements_by_class_name("form-control") {
            doc.remove_class(el, "error")?;
        }
        doc.remove_class(self.success, "show")?;
        Ok(())
    }

    fn flag(&self, doc: &mut Document, field: Field) -> SiteResult<()> {
        let key = field.as_str();
        let message = doc
            .first_with_attribute_value("data-field", key)
            .ok_or_else(|| SiteError::missing(format!("[data-field=\"{key}\"]")))?;
        doc.add_class(message, "show")?;
        let control = doc
            .get_element_by_id(key)
            .ok_or_else(|| SiteError::missing(format!("#{key}")))?;
        doc.add_class(control, "error")?;
        Ok(())
    }

    /// Handle one submit attempt
    pub fn submit(&self, doc: &mut Document) -> SiteResult<ValidationReport> {
        let name = self.read(doc, Field::Name)?;
        let email = self.read(doc, Field::Email)?;
        let phone = self.read(doc, Field::Phone)?;
        let message = self.read(doc, Field::Message)?;

        self.clear_indicators(doc)?;

        let mut invalid = Vec::new();
        for (field, value) in Field::ALL.into_iter().zip([&name, &email, &phone, &message]) {
            if !field.accepts(value) {
                self.flag(doc, field)?;
                invalid.push(field);
            }
        }

        if !invalid.is_empty() {
            tracing::debug!(?invalid, "Contact form rejected");
            return Ok(ValidationReport {
                invalid,
                submission: None,
            });
        }

        let submission = ContactSubmission {
            name,
            email,
            phone,
            message,
        };
        tracing::info!("Form data: {}", serde_json::to_string(&submission)?);
        doc.add_class(self.success, "show")?;
        doc.reset_form(self.form)?;

        Ok(ValidationReport {
            invalid,
            submission: Some(submission),
        })
    }
}
