//! Field validation primitives shared by all aggregates.
//!
//! # Responsibility
//! - Provide stateless checks for blank/length/numeric/date constraints.
//! - Report the field label and the violated constraint, never a generic
//!   message.
//!
//! # Invariants
//! - Checks are pure; no logging, no clock access except `date_not_past`.
//! - Length constraints count Unicode scalar values of the trimmed input.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static DIGITS_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("digit pattern is a valid regex"));

/// Violation of a single field constraint.
///
/// Carries the field label so service callers can surface precise messages
/// without re-deriving which input failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Blank {
        field: &'static str,
    },
    LengthOutOfRange {
        field: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },
    NotNumeric {
        field: &'static str,
        expected_digits: usize,
    },
    PastDate {
        field: &'static str,
    },
}

impl ValidationError {
    /// Returns the label of the field that failed.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Blank { field }
            | Self::LengthOutOfRange { field, .. }
            | Self::NotNumeric { field, .. }
            | Self::PastDate { field } => field,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank { field } => write!(f, "{field} must not be blank"),
            Self::LengthOutOfRange {
                field,
                min,
                max,
                actual,
            } => write!(
                f,
                "{field} must be between {min} and {max} characters, got {actual}"
            ),
            Self::NotNumeric {
                field,
                expected_digits,
            } => write!(f, "{field} must be exactly {expected_digits} numeric digits"),
            Self::PastDate { field } => write!(f, "{field} must not be in the past"),
        }
    }
}

impl Error for ValidationError {}

/// Rejects blank input and returns the trimmed remainder.
pub fn not_blank<'v>(value: &'v str, field: &'static str) -> Result<&'v str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Blank { field });
    }
    Ok(trimmed)
}

/// Checks trimmed length against an inclusive `min..=max` range and returns
/// the trimmed value.
pub fn bounded_length<'v>(
    value: &'v str,
    field: &'static str,
    min: usize,
    max: usize,
) -> Result<&'v str, ValidationError> {
    let trimmed = not_blank(value, field)?;
    let actual = trimmed.chars().count();
    if actual < min || actual > max {
        return Err(ValidationError::LengthOutOfRange {
            field,
            min,
            max,
            actual,
        });
    }
    Ok(trimmed)
}

/// Requires exactly `digits` ASCII digits. The raw value is checked; callers
/// store it unchanged.
pub fn numeric_exact(
    value: &str,
    field: &'static str,
    digits: usize,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    if value.chars().count() != digits || !DIGITS_ONLY.is_match(value) {
        return Err(ValidationError::NotNumeric {
            field,
            expected_digits: digits,
        });
    }
    Ok(())
}

/// Rejects instants strictly before the current wall clock.
pub fn date_not_past(value: DateTime<Utc>, field: &'static str) -> Result<(), ValidationError> {
    if value < Utc::now() {
        return Err(ValidationError::PastDate { field });
    }
    Ok(())
}
