//! # Request Validation
//!
//! Checks a [`CreateFeatureRequest`] before anything touches storage.
//! All violations are collected so the caller sees every bad field at once.

use crate::CreateFeatureRequest;
use crate::primitives::{MAX_CATEGORY_LENGTH, MAX_ICON_LENGTH, MAX_NAME_LENGTH, MAX_STATUS_LENGTH};
use std::fmt;

/// One violated rule on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldViolation {
    /// The field is empty or whitespace only.
    Required { field: &'static str },
    /// The field is longer than `max` characters.
    TooLong { field: &'static str, max: usize },
}

impl FieldViolation {
    /// Name of the field the violation refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::Required { field } | Self::TooLong { field, .. } => field,
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { field } => write!(f, "The {} field is required.", field),
            Self::TooLong { field, max } => write!(
                f,
                "The {} field must be a string with a maximum length of {}.",
                field, max
            ),
        }
    }
}

/// Validate a create request.
///
/// Returns every violation found, in field order
/// (`Name`, `Description`, `Status`, `Category`, `Icon`).
pub fn validate_create(request: &CreateFeatureRequest) -> Result<(), Vec<FieldViolation>> {
    let mut violations = Vec::new();

    check(&mut violations, "Name", &request.name, Some(MAX_NAME_LENGTH));
    check(&mut violations, "Description", &request.description, None);
    check(&mut violations, "Status", &request.status, Some(MAX_STATUS_LENGTH));
    check(&mut violations, "Category", &request.category, Some(MAX_CATEGORY_LENGTH));
    check(&mut violations, "Icon", &request.icon, Some(MAX_ICON_LENGTH));

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn check(
    violations: &mut Vec<FieldViolation>,
    field: &'static str,
    value: &str,
    max: Option<usize>,
) {
    if value.trim().is_empty() {
        violations.push(FieldViolation::Required { field });
        return;
    }
    if let Some(max) = max.filter(|&max| value.chars().count() > max) {
        violations.push(FieldViolation::TooLong { field, max });
    }
}
