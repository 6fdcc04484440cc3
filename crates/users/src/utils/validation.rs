//! Input validation utilities.

use regex::Regex;
use crate::types::{UserError, UserResult};

pub const EMAIL_MAX_LEN: usize = 254;
pub const USERNAME_MAX_CHARS: usize = 150;

/// Validate that an email is present and well formed
pub fn validate_email(email: &str) -> UserResult<()> {
    if email.trim().is_empty() {
        return Err(UserError::required("email", "Email is required."));
    }

    let email_regex = Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .map_err(|e| UserError::Constraint(format!("invalid email pattern: {e}")))?;

    if email.len() > EMAIL_MAX_LEN || !email_regex.is_match(email) {
        return Err(UserError::required("email", "Enter a valid email address."));
    }

    Ok(())
}

/// Validate username: required, at most 150 letters, digits and @/./+/-/_
pub fn validate_username(username: &str) -> UserResult<()> {
    if username.is_empty() {
        return Err(UserError::required("username", "The given username must be set."));
    }

    if username.chars().count() > USERNAME_MAX_CHARS {
        return Err(UserError::Constraint(format!(
            "username must be at most {USERNAME_MAX_CHARS} characters"
        )));
    }

    let username_regex = Regex::new(r"^[\w.@+-]+$")
        .map_err(|e| UserError::Constraint(format!("invalid username pattern: {e}")))?;

    if !username_regex.is_match(username) {
        return Err(UserError::Constraint(
            "username may only contain letters, digits and @/./+/-/_".to_string(),
        ));
    }

    Ok(())
}

/// Validate an optional text field against a character limit
pub fn validate_max_chars(field: &str, value: Option<&str>, max: usize) -> UserResult<()> {
    match value {
        Some(value) if value.chars().count() > max => Err(UserError::Constraint(format!(
            "{field} must be at most {max} characters"
        ))),
        _ => Ok(()),
    }
}

/// Lowercase the domain part of an email, leaving the local part alone
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}
