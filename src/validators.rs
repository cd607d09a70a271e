/// Input validators
/// - Chirp bodies: trimmed, non-empty, at most 140 characters, profanity masked
/// - Email addresses: trimmed, bounded length, practical RFC 5322 shape

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

pub const MAX_CHIRP_LENGTH: usize = 140;
pub const PROFANITY_MASK: &str = "****";

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321

lazy_static! {
    // Any occurrence, any casing
    static ref PROFANITY: Regex = Regex::new(r"(?i)kerfuffle|sharbert|fornax").unwrap();

    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap();
}

/// Validates and cleans a chirp body
/// - Trims surrounding whitespace
/// - Rejects empty bodies and bodies over 140 characters
/// - Masks profane words
pub fn validate_chirp_body(body: &str) -> Result<String, ValidationError> {
    let trimmed = body.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("body"));
    }

    if trimmed.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ValidationError::TooLong("body", MAX_CHIRP_LENGTH));
    }

    Ok(clean_profanity(trimmed))
}

/// Replaces every occurrence of a banned word with the mask, even inside longer words
pub fn clean_profanity(text: &str) -> String {
    PROFANITY.replace_all(text, PROFANITY_MASK).into_owned()
}

/// Validates an email address and returns it trimmed
pub fn is_valid_email(email: &str) -> Result<String, ValidationError> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("email"));
    }

    if trimmed.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong("email", MAX_EMAIL_LENGTH));
    }

    if !EMAIL_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat("email"));
    }

    Ok(trimmed.to_string())
}

/// Passwords are only required to be present
pub fn is_valid_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyField("password"));
    }
    Ok(())
}
