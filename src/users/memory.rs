use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    repo_types::{NewUser, User},
    store::{StoreError, UserStore},
};

/// Process-local store backing the handler tests.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail(user.email));
        }
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password: user.password,
            photo: user.photo,
            phone: user.phone,
            bio: user.bio,
        };
        users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn save(&self, user: &User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        let stored = users
            .get_mut(&user.id)
            .ok_or(StoreError::NotFound(user.id))?;
        stored.name = user.name.clone();
        stored.photo = user.photo.clone();
        stored.phone = user.phone.clone();
        stored.bio = user.bio.clone();
        stored.password = user.password.clone();
        Ok(stored.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::PasswordDigest;

    fn new_user(email: &str) -> NewUser {
        NewUser::new(
            "Ada".into(),
            email.into(),
            PasswordDigest::from_stored("$argon2id$stub".into()),
        )
    }

    #[tokio::test]
    async fn create_applies_defaults_and_rejects_duplicates() {
        let store = MemoryUserStore::default();
        let user = store.create(new_user("ada@example.com")).await.unwrap();
        assert_eq!(user.phone, "+234");
        assert_eq!(user.bio, "bio");

        let err = store.create(new_user("ada@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(e) if e == "ada@example.com"));
    }

    #[tokio::test]
    async fn save_keeps_email_and_requires_existing_row() {
        let store = MemoryUserStore::default();
        let mut user = store.create(new_user("ada@example.com")).await.unwrap();
        user.email = "other@example.com".into();
        user.name = "Ada L".into();
        let saved = store.save(&user).await.unwrap();
        assert_eq!(saved.email, "ada@example.com");
        assert_eq!(saved.name, "Ada L");

        user.id = Uuid::new_v4();
        assert!(matches!(
            store.save(&user).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn lookups() {
        let store = MemoryUserStore::default();
        let user = store.create(new_user("ada@example.com")).await.unwrap();
        assert_eq!(
            store.find_by_email("ada@example.com").await.unwrap().map(|u| u.id),
            Some(user.id)
        );
        assert!(store.find_by_email("bob@example.com").await.unwrap().is_none());
        assert!(store.find_by_id(user.id).await.unwrap().is_some());
        assert!(store.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }
}
