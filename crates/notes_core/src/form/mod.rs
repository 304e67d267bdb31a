//! Form binding and validation for note and auth writes.
//!
//! # Responsibility
//! - Bind raw submitted fields, trim them, and validate presence/limits.
//! - Collect field-level errors for re-rendering instead of failing fast.
//!
//! # Invariants
//! - A form with errors never produces cleaned data.
//! - Error keys are field names, or `NON_FIELD_ERRORS` for form-wide errors.

use serde::Serialize;
use std::collections::BTreeMap;

pub mod auth_form;
pub mod note_form;

/// Raw submitted form fields.
pub type FormData = BTreeMap<String, String>;

/// Error key for errors that do not belong to a single field.
pub const NON_FIELD_ERRORS: &str = "__all__";

pub(crate) const REQUIRED_MESSAGE: &str = "Обязательное поле.";

/// Field-level validation errors, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Returns the messages attached to `field`.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Returns the trimmed value of `name`, or an empty string when absent.
pub(crate) fn field<'a>(data: &'a FormData, name: &str) -> &'a str {
    data.get(name).map_or("", |value| value.trim())
}

pub(crate) fn max_length_message(limit: usize, actual: usize) -> String {
    format!("Убедитесь, что это значение содержит не более {limit} символов (сейчас {actual}).")
}
