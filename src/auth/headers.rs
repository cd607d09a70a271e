/// Credential extraction from the `Authorization` header
///
/// Only the scheme prefix and surrounding whitespace are stripped; the
/// credential itself is checked by whoever consumes it.

use actix_web::http::header::{HeaderMap, AUTHORIZATION};

use crate::error::{AppError, AuthError};

const BEARER_PREFIX: &str = "Bearer";
const API_KEY_PREFIX: &str = "ApiKey";

/// `Authorization: Bearer <token>`
pub fn get_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    credential_with_prefix(headers, BEARER_PREFIX)
}

/// `Authorization: ApiKey <key>`
pub fn get_api_key(headers: &HeaderMap) -> Result<String, AppError> {
    credential_with_prefix(headers, API_KEY_PREFIX)
}

fn credential_with_prefix(headers: &HeaderMap, prefix: &str) -> Result<String, AppError> {
    let raw = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(AppError::Auth(AuthError::MissingAuthHeader))?;

    let credential = raw.strip_prefix(prefix).unwrap_or(raw).trim();
    if credential.is_empty() {
        return Err(AppError::Auth(AuthError::MissingAuthHeader));
    }

    Ok(credential.to_string())
}
