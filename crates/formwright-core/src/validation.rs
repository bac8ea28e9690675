//! Field validation rules and the touch-then-validate interaction state.

use std::{
    collections::{BTreeMap, HashSet},
    fmt,
};

use formwright_domain::{Field, FieldValue};
use regex::Regex;

/// Generic message used when a pattern has no description.
pub const INVALID_FORMAT_MESSAGE: &str = "Invalid format";

/// The single error a field reports for its current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Required { label: String },
    TooShort { min: u32 },
    TooLong { max: u32 },
    PatternMismatch { message: String },
    /// The configured pattern is not a valid regular expression.
    InvalidPattern { pattern: String, reason: String },
}

impl ValidationError {
    /// `true` when the field's configuration is at fault rather than the user's input.
    pub fn is_engine_fault(&self) -> bool {
        matches!(self, ValidationError::InvalidPattern { .. })
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Required { label } => write!(f, "{label} is required"),
            ValidationError::TooShort { min } => {
                write!(f, "Must be at least {min} characters")
            }
            ValidationError::TooLong { max } => {
                write!(f, "Must be no more than {max} characters")
            }
            ValidationError::PatternMismatch { message } => f.write_str(message),
            ValidationError::InvalidPattern { pattern, reason } => {
                write!(f, "Validation pattern `{pattern}` is invalid: {reason}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Computes the validation error, if any, for `value` against `field`.
///
/// Rules run in order and the first failure wins: required, minimum length,
/// maximum length, pattern. Checkboxes only honour the required rule. Choice
/// fields accept values outside their option list.
pub fn validate_field(field: &Field, value: Option<&FieldValue>) -> Option<ValidationError> {
    let empty = value.map_or(true, FieldValue::is_empty);
    if field.required && empty {
        return Some(ValidationError::Required {
            label: field.label.clone(),
        });
    }
    if field.kind.is_boolean() {
        return None;
    }

    let text = value.and_then(FieldValue::as_text).unwrap_or("");
    if field.kind.supports_length_rules() {
        let length = text.chars().count();
        if let Some(min) = field.min_length {
            if length < min as usize {
                return Some(ValidationError::TooShort { min });
            }
        }
        if let Some(max) = field.max_length {
            if length > max as usize {
                return Some(ValidationError::TooLong { max });
            }
        }
    }

    if field.kind.supports_pattern() && !text.is_empty() {
        if let Some(pattern) = field.pattern.as_deref().filter(|p| !p.is_empty()) {
            return match Regex::new(pattern) {
                Ok(re) if re.is_match(text) => None,
                Ok(_) => Some(ValidationError::PatternMismatch {
                    message: field
                        .pattern_description
                        .clone()
                        .filter(|desc| !desc.trim().is_empty())
                        .unwrap_or_else(|| INVALID_FORMAT_MESSAGE.to_string()),
                }),
                Err(err) => {
                    tracing::warn!(field = %field.id, pattern, "field pattern failed to compile");
                    Some(ValidationError::InvalidPattern {
                        pattern: pattern.to_string(),
                        reason: err.to_string(),
                    })
                }
            };
        }
    }
    None
}

/// Tracks which fields were touched and their current errors.
///
/// Blur always validates and marks the field touched; change only validates
/// fields touched before, so users are not scolded while typing for the first time.
#[derive(Debug, Clone, Default)]
pub struct ValidationState {
    touched: HashSet<String>,
    errors: BTreeMap<String, ValidationError>,
}

impl ValidationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blur(&mut self, field: &Field, value: Option<&FieldValue>) -> Option<&ValidationError> {
        self.touched.insert(field.id.clone());
        self.record(field, value)
    }

    pub fn change(&mut self, field: &Field, value: Option<&FieldValue>) -> Option<&ValidationError> {
        if !self.touched.contains(&field.id) {
            return None;
        }
        self.record(field, value)
    }

    /// Marks every field touched and validates it; returns the fields in error.
    pub fn validate_all<'a, I, F>(&mut self, fields: I, value_of: F) -> Vec<(String, ValidationError)>
    where
        I: IntoIterator<Item = &'a Field>,
        F: Fn(&str) -> Option<&'a FieldValue>,
    {
        let mut failures = Vec::new();
        for field in fields {
            self.touched.insert(field.id.clone());
            if let Some(err) = self.record(field, value_of(&field.id)) {
                failures.push((field.id.clone(), err.clone()));
            }
        }
        failures
    }

    pub fn is_touched(&self, field_id: &str) -> bool {
        self.touched.contains(field_id)
    }

    pub fn error(&self, field_id: &str) -> Option<&ValidationError> {
        self.errors.get(field_id)
    }

    pub fn errors(&self) -> impl Iterator<Item = (&String, &ValidationError)> {
        self.errors.iter()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn clear(&mut self) {
        self.touched.clear();
        self.errors.clear();
    }

    fn record(&mut self, field: &Field, value: Option<&FieldValue>) -> Option<&ValidationError> {
        match validate_field(field, value) {
            Some(err) => {
                self.errors.insert(field.id.clone(), err);
                self.errors.get(&field.id)
            }
            None => {
                self.errors.remove(&field.id);
                None
            }
        }
    }
}
