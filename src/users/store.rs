use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::repo_types::{NewUser, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already registered: {0}")]
    DuplicateEmail(String),
    #[error("user not found: {0}")]
    NotFound(Uuid),
    #[error("database error: {0}")]
    Backend(#[from] sqlx::Error),
}

/// System of record for users. Email is unique across all rows.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Fails with [`StoreError::DuplicateEmail`] when the email is taken.
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    /// Persists name, profile fields and password digest. Email is never rewritten.
    async fn save(&self, user: &User) -> Result<User, StoreError>;
}
