use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::error::{AppError, DatabaseError};
use crate::models::{Chirp, RefreshToken, SortOrder, User};
use crate::store::ChirpyStore;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    chirps: Vec<Chirp>,
    refresh_tokens: Vec<RefreshToken>,
}

/// Process-local store with the same constraints as the Postgres schema:
/// unique emails and token values, foreign keys to `users`, cascading deletes.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        self.tables
            .lock()
            .map_err(|_| AppError::Internal("in-memory store lock poisoned".to_string()))
    }
}

impl Tables {
    fn user_exists(&self, id: Uuid) -> bool {
        self.users.iter().any(|u| u.id == id)
    }

    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users
            .iter()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

#[async_trait]
impl ChirpyStore for InMemoryStore {
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, AppError> {
        let mut tables = self.lock()?;
        if tables.email_taken(email, None) {
            return Err(DatabaseError::UniqueConstraintViolation(
                "users_email_key".to_string(),
            )
            .into());
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            is_chirpy_red: false,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.lock()?;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<User, AppError> {
        let mut tables = self.lock()?;
        if tables.email_taken(email, Some(id)) {
            return Err(DatabaseError::UniqueConstraintViolation(
                "users_email_key".to_string(),
            )
            .into());
        }

        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(DatabaseError::NotFound("User"))?;
        user.email = email.to_string();
        user.hashed_password = hashed_password.to_string();
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn upgrade_user(&self, id: Uuid) -> Result<User, AppError> {
        let mut tables = self.lock()?;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(DatabaseError::NotFound("User"))?;
        user.is_chirpy_red = true;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete_all_users(&self) -> Result<u64, AppError> {
        let mut tables = self.lock()?;
        let deleted = tables.users.len() as u64;
        tables.users.clear();
        tables.chirps.clear();
        tables.refresh_tokens.clear();
        Ok(deleted)
    }

    async fn create_chirp(&self, body: &str, user_id: Uuid) -> Result<Chirp, AppError> {
        let mut tables = self.lock()?;
        if !tables.user_exists(user_id) {
            return Err(DatabaseError::ForeignKeyViolation("chirps_user_id_fkey".to_string()).into());
        }

        let now = Utc::now();
        let chirp = Chirp {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            body: body.to_string(),
            user_id,
        };
        tables.chirps.push(chirp.clone());
        Ok(chirp)
    }

    async fn list_chirps(
        &self,
        author_id: Option<Uuid>,
        order: SortOrder,
    ) -> Result<Vec<Chirp>, AppError> {
        let tables = self.lock()?;
        // Insertion order already follows created_at
        let mut chirps: Vec<Chirp> = tables
            .chirps
            .iter()
            .filter(|c| author_id.map_or(true, |author| c.user_id == author))
            .cloned()
            .collect();
        if order == SortOrder::Desc {
            chirps.reverse();
        }
        Ok(chirps)
    }

    async fn get_chirp(&self, id: Uuid) -> Result<Option<Chirp>, AppError> {
        let tables = self.lock()?;
        Ok(tables.chirps.iter().find(|c| c.id == id).cloned())
    }

    async fn delete_chirp(&self, id: Uuid) -> Result<(), AppError> {
        let mut tables = self.lock()?;
        let before = tables.chirps.len();
        tables.chirps.retain(|c| c.id != id);
        if tables.chirps.len() == before {
            return Err(DatabaseError::NotFound("Chirp").into());
        }
        Ok(())
    }

    async fn create_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshToken, AppError> {
        let mut tables = self.lock()?;
        if !tables.user_exists(user_id) {
            return Err(DatabaseError::ForeignKeyViolation(
                "refresh_tokens_user_id_fkey".to_string(),
            )
            .into());
        }
        if tables.refresh_tokens.iter().any(|t| t.token == token) {
            return Err(DatabaseError::UniqueConstraintViolation(
                "refresh_tokens_pkey".to_string(),
            )
            .into());
        }

        let now = Utc::now();
        let refresh_token = RefreshToken {
            token: token.to_string(),
            created_at: now,
            updated_at: now,
            user_id,
            expires_at,
            revoked_at: None,
        };
        tables.refresh_tokens.push(refresh_token.clone());
        Ok(refresh_token)
    }

    async fn get_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, AppError> {
        let tables = self.lock()?;
        Ok(tables.refresh_tokens.iter().find(|t| t.token == token).cloned())
    }

    async fn revoke_refresh_token(&self, token: &str) -> Result<(), AppError> {
        let mut tables = self.lock()?;
        let refresh_token = tables
            .refresh_tokens
            .iter_mut()
            .find(|t| t.token == token)
            .ok_or(DatabaseError::NotFound("Refresh token"))?;
        let now = Utc::now();
        refresh_token.revoked_at.get_or_insert(now);
        refresh_token.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = InMemoryStore::new();
        store.create_user("a@b.com", "hash").await.expect("first insert");

        let result = store.create_user("a@b.com", "hash").await;
        assert!(matches!(
            result,
            Err(AppError::Database(DatabaseError::UniqueConstraintViolation(_)))
        ));
    }

    #[tokio::test]
    async fn test_chirp_requires_existing_author() {
        let store = InMemoryStore::new();
        let result = store.create_chirp("hello", Uuid::new_v4()).await;
        assert!(matches!(
            result,
            Err(AppError::Database(DatabaseError::ForeignKeyViolation(_)))
        ));
    }

    #[tokio::test]
    async fn test_list_chirps_filters_and_sorts() {
        let store = InMemoryStore::new();
        let alice = store.create_user("alice@example.com", "h").await.unwrap();
        let bob = store.create_user("bob@example.com", "h").await.unwrap();
        let first = store.create_chirp("one", alice.id).await.unwrap();
        store.create_chirp("two", bob.id).await.unwrap();
        let third = store.create_chirp("three", alice.id).await.unwrap();

        let all = store.list_chirps(None, SortOrder::Asc).await.unwrap();
        assert_eq!(all.len(), 3);

        let alices = store.list_chirps(Some(alice.id), SortOrder::Desc).await.unwrap();
        assert_eq!(alices, vec![third, first]);
    }

    #[tokio::test]
    async fn test_wipe_cascades() {
        let store = InMemoryStore::new();
        let user = store.create_user("a@b.com", "h").await.unwrap();
        let chirp = store.create_chirp("hi", user.id).await.unwrap();
        store
            .create_refresh_token("tok", user.id, Utc::now() + Duration::days(1))
            .await
            .unwrap();

        assert_eq!(store.delete_all_users().await.unwrap(), 1);
        assert!(store.get_chirp(chirp.id).await.unwrap().is_none());
        assert!(store.get_refresh_token("tok").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_second_revoke_keeps_original_timestamp() {
        let store = InMemoryStore::new();
        let user = store.create_user("a@b.com", "h").await.unwrap();
        store
            .create_refresh_token("tok", user.id, Utc::now() + Duration::days(1))
            .await
            .unwrap();

        store.revoke_refresh_token("tok").await.unwrap();
        let first = store.get_refresh_token("tok").await.unwrap().unwrap().revoked_at;
        store.revoke_refresh_token("tok").await.unwrap();
        let second = store.get_refresh_token("tok").await.unwrap().unwrap().revoked_at;

        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_revoke_unknown_token_is_not_found() {
        let store = InMemoryStore::new();
        let result = store.revoke_refresh_token("missing").await;
        assert!(matches!(
            result,
            Err(AppError::Database(DatabaseError::NotFound(_)))
        ));
    }
}
