//! Field-level validation vocabulary.
//!
//! Request DTOs carry `validator` derives; this module holds the shared
//! pieces: the [`FieldViolation`] shape reported to clients, the custom
//! rules that the derive macro cannot express, and the conversion from
//! [`ValidationErrors`] into a flat violation list so callers always see
//! every problem at once rather than just the first.

use chrono::{DateTime, NaiveDate};
use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

/// A single field-level rule violation.
#[derive(Debug, Clone, Serialize)]
pub struct FieldViolation {
    /// Wire-level field name (camelCase, as it appears in request bodies).
    pub field: String,
    pub message: String,
}

/// Flatten [`ValidationErrors`] into per-field violations.
///
/// Field names are converted to their wire spelling and the result is
/// sorted by field so error payloads are deterministic.
pub fn field_violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| FieldViolation {
                field: wire_name(field.as_ref()),
                message: err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", wire_name(field.as_ref()))),
            })
        })
        .collect();
    violations.sort_by(|a, b| a.field.cmp(&b.field));
    violations
}

/// Convert a snake_case struct field name to its camelCase wire name.
pub fn wire_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Phone numbers may only contain digits, spaces, `-`, `+`, `(` and `)`.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let well_formed = !phone.is_empty()
        && phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '+' | '(' | ')'));

    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::new("phone").with_message("Invalid phone number".into()))
    }
}

/// Parse an enrollment date from either a strict `YYYY-MM-DD` string or an
/// RFC 3339 datetime, normalizing to a calendar date.
pub fn parse_enrollment_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive())
}
