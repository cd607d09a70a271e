/// Access Token Issuance and Validation
///
/// HS256 tokens keyed by the shared secret. Validation is a pure function of
/// (token, secret, current time); there is no server-side revocation list.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::{Claims, ISSUER};
use crate::error::{AppError, AuthError};

/// Generate a new access token for a user
///
/// # Errors
/// Returns an internal error if signing fails
pub fn generate_access_token(
    user_id: &Uuid,
    secret: &str,
    expires_in: Duration,
) -> Result<String, AppError> {
    let claims = Claims::new(*user_id, Utc::now().timestamp(), expires_in.num_seconds());

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Validate an access token and return the user it was issued to
///
/// # Errors
/// `AuthError::InvalidOrExpiredToken` for a bad signature, a malformed token,
/// a foreign issuer or an expired token alike.
pub fn validate_access_token(token: &str, secret: &str) -> Result<Uuid, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.leeway = 0;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("JWT validation error: {}", e);
        AppError::Auth(AuthError::InvalidOrExpiredToken)
    })?;

    claims.user_id()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-characters-long";

    #[test]
    fn test_generate_and_validate_token() {
        let user_id = Uuid::new_v4();

        let token = generate_access_token(&user_id, SECRET, Duration::hours(1))
            .expect("Failed to generate token");
        let validated = validate_access_token(&token, SECRET).expect("Failed to validate token");

        assert_eq!(validated, user_id);
    }

    #[test]
    fn test_expired_token() {
        let user_id = Uuid::new_v4();

        let token = generate_access_token(&user_id, SECRET, Duration::seconds(-5))
            .expect("Failed to generate token");
        let result = validate_access_token(&token, SECRET);

        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::InvalidOrExpiredToken))
        ));
    }

    #[test]
    fn test_token_expires_after_ttl_elapses() {
        let user_id = Uuid::new_v4();
        let token = generate_access_token(&user_id, SECRET, Duration::seconds(1))
            .expect("Failed to generate token");

        std::thread::sleep(std::time::Duration::from_millis(2100));

        assert!(validate_access_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let user_id = Uuid::new_v4();

        let token = generate_access_token(&user_id, SECRET, Duration::hours(1))
            .expect("Failed to generate token");
        let result = validate_access_token(&token, "another-secret");

        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::InvalidOrExpiredToken))
        ));
    }

    #[test]
    fn test_invalid_token() {
        let result = validate_access_token("invalid.token.here", SECRET);
        assert!(result.is_err());
    }

    #[test]
    fn test_tampered_token() {
        let user_id = Uuid::new_v4();
        let token = generate_access_token(&user_id, SECRET, Duration::hours(1))
            .expect("Failed to generate token");

        let tampered = format!("{}X", token);
        assert!(validate_access_token(&tampered, SECRET).is_err());
    }

    #[test]
    fn test_foreign_issuer_rejected() {
        let mut claims = Claims::new(Uuid::new_v4(), Utc::now().timestamp(), 3600);
        claims.iss = "someone-else".to_string();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(validate_access_token(&token, SECRET).is_err());
    }
}
