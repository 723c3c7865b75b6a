use std::fmt;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("stored password digest is malformed: {0}")]
    MalformedDigest(String),
    #[error("password worker panicked: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Argon2 PHC string for a user's password.
///
/// Only two ways in: hashing a plaintext ([`hash_password`]) or loading a value that
/// was already stored. A digest is therefore never fed back into the hasher.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    pub(crate) fn from_stored(phc: String) -> Self {
        Self(phc)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

pub fn hash_password(plain: &str) -> Result<PasswordDigest, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            PasswordError::Hash(e.to_string())
        })?
        .to_string();
    Ok(PasswordDigest(hash))
}

pub fn verify_password(plain: &str, digest: &PasswordDigest) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(digest.as_str()).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        PasswordError::MalformedDigest(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Runs [`hash_password`] on the blocking pool.
pub async fn hash_in_background(plain: String) -> Result<PasswordDigest, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&plain)).await?
}

/// Runs [`verify_password`] on the blocking pool.
pub async fn verify_in_background(
    plain: String,
    digest: PasswordDigest,
) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&plain, &digest)).await?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let digest = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &digest).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let digest = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &digest).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_digest() {
        let digest = PasswordDigest::from_stored("not-a-valid-hash".into());
        let err = verify_password("anything", &digest).unwrap_err();
        assert!(matches!(err, PasswordError::MalformedDigest(_)));
    }

    #[test]
    fn digest_is_salted_and_never_the_plaintext() {
        let first = hash_password("secret1").unwrap();
        let second = hash_password("secret1").unwrap();
        assert_ne!(first.as_str(), "secret1");
        assert!(first.as_str().starts_with("$argon2"));
        assert_ne!(first, second);
    }

    #[test]
    fn debug_output_hides_digest() {
        let digest = hash_password("secret1").unwrap();
        assert_eq!(format!("{digest:?}"), "PasswordDigest(..)");
    }

    #[tokio::test]
    async fn background_helpers_match_sync_versions() {
        let digest = hash_in_background("secret1".into()).await.unwrap();
        assert!(verify_in_background("secret1".into(), digest.clone())
            .await
            .unwrap());
        assert!(!verify_in_background("secret2".into(), digest).await.unwrap());
    }
}
