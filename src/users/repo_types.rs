use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::password::PasswordDigest;

pub const DEFAULT_PHOTO: &str = "https://i.ibb.co/4pDNDk1/avatar.png";
pub const DEFAULT_PHONE: &str = "+234";
pub const DEFAULT_BIO: &str = "bio";

/// User record. Not `Serialize`: clients only ever see [`super::dto::PublicUser`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: PasswordDigest,
    pub photo: String,
    pub phone: String,
    pub bio: String,
}

/// Fields for a user that does not exist yet; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: PasswordDigest,
    pub photo: String,
    pub phone: String,
    pub bio: String,
}

impl NewUser {
    pub fn new(name: String, email: String, password: PasswordDigest) -> Self {
        Self {
            name,
            email,
            password,
            photo: DEFAULT_PHOTO.into(),
            phone: DEFAULT_PHONE.into(),
            bio: DEFAULT_BIO.into(),
        }
    }
}

/// Row shape of the `users` table.
#[derive(Debug, FromRow)]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub photo: String,
    pub phone: String,
    pub bio: String,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            email: r.email,
            password: PasswordDigest::from_stored(r.password_hash),
            photo: r.photo,
            phone: r.phone,
            bio: r.bio,
        }
    }
}
