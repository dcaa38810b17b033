//! Field-level validation of submitted forms.

use serde::Serialize;
use thiserror::Error;

/// Column widths of the persisted tables.
pub(crate) const SHORT_TEXT: usize = 120;
pub(crate) const LONG_TEXT: usize = 500;

/// One rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every field error found in one submission.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{}", summarize(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(FieldError::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError {
                field,
                message: message.into(),
            }],
        }
    }

    /// Returns true if `field` was rejected.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

/// Collects field errors while a form is converted into row fields.
#[derive(Debug, Default)]
pub(crate) struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reject(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Trims a required value. Blank or over-long input is rejected.
    pub(crate) fn required(&mut self, field: &'static str, value: &str, max_len: usize) -> String {
        let value = value.trim();
        if value.is_empty() {
            self.reject(field, "is required");
        } else if value.chars().count() > max_len {
            self.reject(field, format!("must be at most {max_len} characters"));
        }
        value.to_string()
    }

    /// Trims an optional value; blank input becomes `None`.
    pub(crate) fn optional(
        &mut self,
        field: &'static str,
        value: Option<&str>,
        max_len: usize,
    ) -> Option<String> {
        let value = value.map(str::trim).filter(|v| !v.is_empty())?;
        if value.chars().count() > max_len {
            self.reject(field, format!("must be at most {max_len} characters"));
        }
        Some(value.to_string())
    }

    /// Optional absolute http(s) link.
    pub(crate) fn optional_url(
        &mut self,
        field: &'static str,
        value: Option<&str>,
        max_len: usize,
    ) -> Option<String> {
        let value = self.optional(field, value, max_len)?;
        if !(value.starts_with("http://") || value.starts_with("https://")) {
            self.reject(field, "must be an http:// or https:// URL");
        }
        Some(value)
    }

    /// Optional phone number: digits plus common separators, at least 7 digits.
    pub(crate) fn optional_phone(
        &mut self,
        field: &'static str,
        value: Option<&str>,
    ) -> Option<String> {
        let value = self.optional(field, value, SHORT_TEXT)?;
        let allowed = value
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '(' | ')' | '.' | ' '));
        let digits = value.chars().filter(char::is_ascii_digit).count();
        if !allowed || digits < 7 {
            self.reject(field, "is not a valid phone number");
        }
        Some(value)
    }

    /// Required reference to another row. Yields 0 when absent.
    pub(crate) fn required_id(&mut self, field: &'static str, value: Option<i64>) -> i64 {
        value.unwrap_or_else(|| {
            self.reject(field, "is required");
            0
        })
    }

    pub(crate) fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                errors: self.errors,
            })
        }
    }
}
