//! Contact validation rules. The server applies them authoritatively and the client runs
//! the same checks before issuing a request.

use crate::{
    domain::{ContactDraft, ContactField},
    error::FieldErrors,
};

pub const PHONE_MIN_DIGITS: usize = 10;
pub const PHONE_MAX_DIGITS: usize = 15;

pub fn validate_draft(draft: &ContactDraft) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if draft.name.trim().is_empty() {
        errors.insert(ContactField::Name, "Name is required".to_string());
    }

    if !is_plausible_email(&draft.email) {
        errors.insert(ContactField::Email, "Invalid email".to_string());
    }

    if let Some(message) = phone_error(&draft.phone) {
        errors.insert(ContactField::Phone, message.to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Syntactic check only: an `@` and a `.` somewhere in the value.
pub fn is_plausible_email(email: &str) -> bool {
    !email.is_empty() && email.contains('@') && email.contains('.')
}

fn phone_error(phone: &str) -> Option<&'static str> {
    if phone.is_empty() {
        return Some("Phone number is required");
    }
    if !phone.chars().all(|c| c.is_ascii_digit()) {
        return Some("Phone number must contain only digits");
    }
    if !(PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&phone.len()) {
        return Some("Phone number must be 10-15 digits");
    }
    None
}

/// Strips everything but ASCII digits, as applied to phone input while typing.
pub fn sanitize_phone(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
