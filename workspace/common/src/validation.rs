use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// Field name → human readable messages, in the shape returned to clients.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Contact phone numbers: 10 to 15 digits with an optional leading `+`.
pub static PHONE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?\d{10,15}$").expect("phone number pattern is valid"));

/// Upper bound on images attached to a listing.
pub const MAX_LISTING_IMAGES: usize = 10;

pub const MIN_PASSWORD_LENGTH: u64 = 8;

pub(crate) fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Flattens `validator` output into [`FieldErrors`].
///
/// Nested struct and list errors are not produced by any DTO in this crate,
/// only plain field errors are carried over.
pub fn to_field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    for (field, kind) in errors.errors() {
        if let ValidationErrorsKind::Field(list) = kind {
            let messages = out.entry(field.to_string()).or_default();
            for error in list {
                let message = match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("The {} field is invalid ({}).", field, error.code),
                };
                messages.push(message);
            }
        }
    }
    out
}

/// Adds a single message to a [`FieldErrors`] map.
pub fn push_field_error(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.into());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_pattern() {
        assert!(PHONE_NUMBER_RE.is_match("+36301234567"));
        assert!(PHONE_NUMBER_RE.is_match("0630123456"));
        assert!(!PHONE_NUMBER_RE.is_match("123"));
        assert!(!PHONE_NUMBER_RE.is_match("+36 30 123 4567"));
        assert!(!PHONE_NUMBER_RE.is_match("1234567890123456"));
    }

    #[test]
    fn flattens_messages_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add("title", field_error("required", "The title field is required."));
        errors.add("lat", ValidationError::new("range"));

        let flat = to_field_errors(&errors);
        assert_eq!(flat["title"], vec!["The title field is required.".to_string()]);
        assert_eq!(flat["lat"], vec!["The lat field is invalid (range).".to_string()]);
    }
}
