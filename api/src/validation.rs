use std::{collections::BTreeMap, fmt};

use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::error::AppError;

/// Per-field validation messages, keyed by the submitted field name.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    /// Turns the collected errors into a rejection that echoes the submitted
    /// input back to the caller.
    pub fn into_app_error(self, input: Option<Value>) -> AppError {
        AppError::RequestError {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            msg: "Please correct the errors below".into(),
            fields: serde_json::to_value(&self).ok(),
            input,
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.fields().collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

pub const REQUIRED: &str = "This field is required.";

/// Trims `value` and checks it against an optional maximum length counted in
/// characters.
pub fn clean_text(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    required: bool,
    max_chars: Option<usize>,
) -> String {
    let value = value.trim();

    if required && value.is_empty() {
        errors.add(field, REQUIRED);
    }

    if let Some(max) = max_chars {
        let len = value.chars().count();
        if len > max {
            errors.add(
                field,
                format!("Ensure this value has at most {max} characters (it has {len})."),
            );
        }
    }

    value.to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clean_text_trims_and_requires() {
        let mut errors = FieldErrors::new();
        let value = clean_text(&mut errors, "title", "   ", true, None);
        assert_eq!(value, "");
        assert!(errors.contains("title"));
    }

    #[test]
    fn test_clean_text_counts_characters_not_bytes() {
        let mut errors = FieldErrors::new();
        let value = clean_text(&mut errors, "name", " привет ", true, Some(6));
        assert_eq!(value, "привет");
        assert!(errors.is_empty(), "six cyrillic letters fit in six chars");

        clean_text(&mut errors, "name", "привет!", true, Some(6));
        assert!(errors.contains("name"));
    }

    #[test]
    fn test_field_errors_serialize_as_map() {
        let mut errors = FieldErrors::new();
        errors.add("text", REQUIRED);
        errors.add("text", "second");
        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(value, serde_json::json!({ "text": [REQUIRED, "second"] }));
        assert_eq!(errors.to_string(), "invalid fields: text");
    }
}
