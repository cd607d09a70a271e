/// Password Hashing and Verification
///
/// Salted bcrypt hashes. Verification never distinguishes a wrong password
/// from a corrupt stored hash.

use bcrypt::{hash, verify};

use crate::error::{AppError, AuthError};

/// bcrypt work factor
const HASH_COST: u32 = 10;

/// Hash a password using bcrypt
///
/// # Errors
/// Returns an internal error only if the bcrypt implementation fails;
/// the password content itself is never rejected here.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, HASH_COST)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its stored hash
///
/// # Errors
/// `AuthError::InvalidCredentials` on any mismatch, including a malformed hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AppError> {
    match verify(password, hash) {
        Ok(true) => Ok(()),
        Ok(false) => Err(AuthError::InvalidCredentials.into()),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash could not be checked");
            Err(AuthError::InvalidCredentials.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let password = "Start2020";
        let hash = hash_password(password).expect("Failed to hash password");

        assert_ne!(password, hash);
        assert!(hash.starts_with("$2"));
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("Start2020").expect("Failed to hash password");
        assert!(verify_password("Start2020", &hash).is_ok());
    }

    #[test]
    fn test_verify_wrong_password() {
        let hash = hash_password("Start2020").expect("Failed to hash password");
        let result = verify_password("Start2021", &hash);

        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::InvalidCredentials))
        ));
    }

    #[test]
    fn test_malformed_hash_is_a_plain_mismatch() {
        let result = verify_password("Start2020", "not-a-bcrypt-hash");
        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::InvalidCredentials))
        ));
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        let first = hash_password("pw").unwrap();
        let second = hash_password("pw").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("pw", &first).is_ok());
        assert!(verify_password("pw", &second).is_ok());
    }
}
