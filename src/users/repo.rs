use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    repo_types::{NewUser, User, UserRow},
    store::{StoreError, UserStore},
};

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, photo, phone, bio
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(User::from))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, photo, phone, bio
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(User::from))
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, email, password_hash, photo, phone, bio)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, email, password_hash, photo, phone, bio
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.password.as_str())
        .bind(&user.photo)
        .bind(&user.phone)
        .bind(&user.bio)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateEmail(user.email.clone())
            } else {
                StoreError::Backend(e)
            }
        })?;
        Ok(row.into())
    }

    async fn save(&self, user: &User) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
               SET name = $2, photo = $3, phone = $4, bio = $5, password_hash = $6,
                   updated_at = now()
             WHERE id = $1
            RETURNING id, name, email, password_hash, photo, phone, bio
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.photo)
        .bind(&user.phone)
        .bind(&user.bio)
        .bind(user.password.as_str())
        .fetch_optional(&self.db)
        .await?;
        row.map(User::from).ok_or(StoreError::NotFound(user.id))
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
        assert!(!is_unique_violation(&sqlx::Error::PoolTimedOut));
    }
}
