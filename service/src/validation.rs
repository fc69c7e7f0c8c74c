//! Request validation utilities using the validator crate.
//!
//! Query structs derive `Validate` and call the custom validators here.
//!
//! ```ignore
//! use validator::Validate;
//! use crate::validation::validate_zip;
//!
//! #[derive(Validate)]
//! struct FindRepQuery {
//!     #[validate(custom(function = "validate_zip"))]
//!     zip: String,
//! }
//! ```

use validator::{ValidationError, ValidationErrors};

/// Validates that a string is a five-digit US postal code.
///
/// # Errors
///
/// Returns a `ValidationError` with code `invalid_zip` unless the value is
/// exactly five ASCII digits.
pub fn validate_zip(value: &str) -> Result<(), ValidationError> {
    if value.len() == 5 && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_zip").with_message("zip must be exactly 5 digits".into()))
    }
}

/// First failing field and its message, for problem responses.
#[must_use]
pub fn first_error(errors: &ValidationErrors) -> (String, String) {
    errors
        .field_errors()
        .into_iter()
        .next()
        .map_or_else(
            || (String::new(), "invalid request".to_string()),
            |(field, errs)| {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(ToString::to_string))
                    .unwrap_or_else(|| format!("{field} is invalid"));
                (field.to_string(), message)
            },
        )
}
