/// Storage seam
///
/// Handlers only talk to `ChirpyStore`. The database enforces uniqueness,
/// foreign keys and cascades; implementations surface those violations as
/// `DatabaseError` kinds rather than panicking or retrying.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Chirp, RefreshToken, SortOrder, User};

mod memory;
mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

#[async_trait]
pub trait ChirpyStore: Send + Sync {
    // Users
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, AppError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<User, AppError>;
    async fn upgrade_user(&self, id: Uuid) -> Result<User, AppError>;
    /// Deletes every user; chirps and refresh tokens go with them
    async fn delete_all_users(&self) -> Result<u64, AppError>;

    // Chirps
    async fn create_chirp(&self, body: &str, user_id: Uuid) -> Result<Chirp, AppError>;
    async fn list_chirps(
        &self,
        author_id: Option<Uuid>,
        order: SortOrder,
    ) -> Result<Vec<Chirp>, AppError>;
    async fn get_chirp(&self, id: Uuid) -> Result<Option<Chirp>, AppError>;
    async fn delete_chirp(&self, id: Uuid) -> Result<(), AppError>;

    // Refresh tokens
    async fn create_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshToken, AppError>;
    async fn get_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, AppError>;
    /// Sets `revoked_at` to now; revoking an already revoked token is a no-op update
    async fn revoke_refresh_token(&self, token: &str) -> Result<(), AppError>;
}
