//! Field validators shared by the entity create helpers.
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ModelError;

static EMAIL_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").ok());

// Mainland mobile numbers: 11 digits, second digit 3..=9
static PHONE_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^1[3-9]\d{9}$").ok());

pub fn is_valid_email(email: &str) -> bool {
    matches!(EMAIL_RE.as_ref(), Some(re) if re.is_match(email))
}

pub fn is_valid_phone(phone: &str) -> bool {
    matches!(PHONE_RE.as_ref(), Some(re) if re.is_match(phone))
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    if !is_valid_email(email) {
        return Err(ModelError::validation("Invalid email format"));
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), ModelError> {
    if !is_valid_phone(phone) {
        return Err(ModelError::validation("Invalid phone number format"));
    }
    Ok(())
}

/// Rejects blank values, naming the field in the message.
pub fn require(field: &str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::Validation(format!("Missing required field: {field}")));
    }
    Ok(())
}

pub fn max_len(field: &str, value: &str, max: usize) -> Result<(), ModelError> {
    if value.chars().count() > max {
        return Err(ModelError::Validation(format!("{field} must be at most {max} characters")));
    }
    Ok(())
}
