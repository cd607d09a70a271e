/// Refresh Token Management
///
/// Refresh tokens are:
/// - 32 bytes from the OS entropy source, hex-encoded (64 characters)
/// - Stored server-side as the primary key of `refresh_tokens`
/// - Reused until they expire or are revoked (no rotation on refresh)
/// - Never deleted, only marked revoked

use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use uuid::Uuid;

use crate::error::{AppError, AuthError, DatabaseError};
use crate::models::RefreshToken;
use crate::store::ChirpyStore;

const REFRESH_TOKEN_BYTES: usize = 32;

/// Generate a new cryptographically secure refresh token
///
/// # Errors
/// Returns an internal error if the OS entropy source fails
pub fn generate_refresh_token() -> Result<String, AppError> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AppError::Internal(format!("Entropy source failed: {}", e)))?;
    Ok(hex::encode(bytes))
}

/// Persist a freshly generated token for `user_id`
///
/// # Errors
/// Fails if the user does not exist or the token value collides;
/// neither case is retried.
pub async fn save_refresh_token(
    store: &dyn ChirpyStore,
    user_id: Uuid,
    token: &str,
    expiry_seconds: i64,
) -> Result<RefreshToken, AppError> {
    let expires_at = Utc::now() + Duration::seconds(expiry_seconds);
    store.create_refresh_token(token, user_id, expires_at).await
}

/// Fetch the stored record for a token
///
/// # Errors
/// `DatabaseError::NotFound` when the token was never issued
pub async fn lookup_refresh_token(
    store: &dyn ChirpyStore,
    token: &str,
) -> Result<RefreshToken, AppError> {
    store
        .get_refresh_token(token)
        .await?
        .ok_or(AppError::Database(DatabaseError::NotFound("Refresh token")))
}

/// Revoke a refresh token
///
/// # Errors
/// `DatabaseError::NotFound` when the token was never issued. Revoking an
/// already revoked token succeeds and keeps the original revocation time.
pub async fn revoke_refresh_token(store: &dyn ChirpyStore, token: &str) -> Result<(), AppError> {
    store.revoke_refresh_token(token).await
}

/// Resolve a refresh token to the user allowed to mint a new access token
///
/// Checks:
/// 1. Token exists
/// 2. Token has not been revoked
/// 3. Token has not expired
///
/// # Errors
/// `AuthError::InvalidRefreshToken` for every failed check
pub async fn user_for_refresh_token(
    store: &dyn ChirpyStore,
    token: &str,
) -> Result<Uuid, AppError> {
    let record = match lookup_refresh_token(store, token).await {
        Ok(record) => record,
        Err(AppError::Database(DatabaseError::NotFound(_))) => {
            tracing::warn!("Refresh token not found");
            return Err(AuthError::InvalidRefreshToken.into());
        }
        Err(e) => return Err(e),
    };

    check_usable(&record, Utc::now())?;
    Ok(record.user_id)
}

fn check_usable(record: &RefreshToken, now: DateTime<Utc>) -> Result<(), AppError> {
    if record.is_revoked() {
        tracing::warn!(user_id = %record.user_id, "Attempt to use revoked refresh token");
        return Err(AuthError::InvalidRefreshToken.into());
    }

    if record.is_expired_at(now) {
        tracing::info!(user_id = %record.user_id, "Refresh token expired");
        return Err(AuthError::InvalidRefreshToken.into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use std::collections::HashSet;

    #[test]
    fn test_generate_refresh_token() {
        let token = generate_refresh_token().unwrap();

        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_distinct() {
        let tokens: HashSet<String> = (0..1000)
            .map(|_| generate_refresh_token().unwrap())
            .collect();
        assert_eq!(tokens.len(), 1000);
    }

    #[tokio::test]
    async fn test_valid_token_resolves_to_owner() {
        let store = InMemoryStore::new();
        let user = store.create_user("a@b.com", "h").await.unwrap();
        let token = generate_refresh_token().unwrap();
        save_refresh_token(&store, user.id, &token, 3600).await.unwrap();

        assert_eq!(user_for_refresh_token(&store, &token).await.unwrap(), user.id);
    }

    #[tokio::test]
    async fn test_unknown_token_rejected() {
        let store = InMemoryStore::new();
        let result = user_for_refresh_token(&store, "never-issued").await;

        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::InvalidRefreshToken))
        ));
    }

    #[tokio::test]
    async fn test_revoked_token_rejected() {
        let store = InMemoryStore::new();
        let user = store.create_user("a@b.com", "h").await.unwrap();
        let token = generate_refresh_token().unwrap();
        save_refresh_token(&store, user.id, &token, 3600).await.unwrap();

        revoke_refresh_token(&store, &token).await.unwrap();
        let record = lookup_refresh_token(&store, &token).await.unwrap();
        assert!(record.is_revoked());

        let result = user_for_refresh_token(&store, &token).await;
        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::InvalidRefreshToken))
        ));
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let store = InMemoryStore::new();
        let user = store.create_user("a@b.com", "h").await.unwrap();
        let token = generate_refresh_token().unwrap();
        save_refresh_token(&store, user.id, &token, -1).await.unwrap();

        assert!(user_for_refresh_token(&store, &token).await.is_err());
    }

    #[tokio::test]
    async fn test_save_for_unknown_user_fails() {
        let store = InMemoryStore::new();
        let token = generate_refresh_token().unwrap();
        let result = save_refresh_token(&store, Uuid::new_v4(), &token, 3600).await;

        assert!(matches!(
            result,
            Err(AppError::Database(DatabaseError::ForeignKeyViolation(_)))
        ));
    }

    #[test]
    fn test_check_usable_boundaries() {
        let now = Utc::now();
        let mut record = RefreshToken {
            token: "t".to_string(),
            created_at: now,
            updated_at: now,
            user_id: Uuid::new_v4(),
            expires_at: now + Duration::seconds(10),
            revoked_at: None,
        };
        assert!(check_usable(&record, now).is_ok());
        assert!(check_usable(&record, now + Duration::seconds(10)).is_err());

        record.revoked_at = Some(now);
        assert!(check_usable(&record, now).is_err());
    }
}
