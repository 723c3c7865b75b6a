use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use super::claims::Claims;
use crate::config::JwtConfig;

#[derive(Debug, Error)]
pub enum TokenError {
    /// Malformed, badly signed, foreign or expired. Deliberately carries no detail.
    #[error("invalid or expired token")]
    Invalid,
    #[error("jwt signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Signing and verification keys plus the claims every token must carry.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.expose_secret().as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.expose_secret().as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::hours(cfg.ttl_hours),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        self.sign_at(user_id, OffsetDateTime::now_utc())
    }

    pub(crate) fn sign_at(
        &self,
        user_id: Uuid,
        issued_at: OffsetDateTime,
    ) -> Result<String, TokenError> {
        let exp = issued_at + self.ttl;
        let claims = Claims {
            id: user_id,
            iat: issued_at.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token =
            encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Signing)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|_| {
            debug!("jwt rejected");
            TokenError::Invalid
        })?;
        debug!(user_id = %data.claims.id, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn make_keys(secret: &str, issuer: &str, audience: &str) -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: SecretString::from(secret.to_string()),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl_hours: 24,
        })
    }

    #[test]
    fn issue_and_verify_token() {
        let keys = make_keys("dev-secret", "test-issuer", "test-aud");
        let user_id = Uuid::new_v4();
        let token = keys.issue(user_id).expect("issue");
        let claims = keys.verify(&token).expect("verify token");
        assert_eq!(claims.id, user_id);
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn verify_rejects_expired_token() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let two_days_ago = OffsetDateTime::now_utc() - Duration::days(2);
        let token = keys.sign_at(Uuid::new_v4(), two_days_ago).unwrap();
        assert!(matches!(keys.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn verify_rejects_foreign_secret() {
        let ours = make_keys("our-secret", "iss", "aud");
        let theirs = make_keys("their-secret", "iss", "aud");
        let token = theirs.issue(Uuid::new_v4()).unwrap();
        assert!(matches!(ours.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn verify_rejects_wrong_issuer_or_audience() {
        let good_keys = make_keys("same-secret", "good-iss", "good-aud");
        let bad_keys = make_keys("same-secret", "bad-iss", "bad-aud");
        let token = good_keys.issue(Uuid::new_v4()).unwrap();
        assert!(matches!(bad_keys.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn verify_rejects_garbage() {
        let keys = make_keys("dev-secret", "iss", "aud");
        for token in ["", "not-a-jwt", "a.b.c"] {
            assert!(matches!(keys.verify(token), Err(TokenError::Invalid)));
        }
    }

    #[test]
    fn expired_and_forged_tokens_fail_identically() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let expired = keys
            .sign_at(Uuid::new_v4(), OffsetDateTime::now_utc() - Duration::days(2))
            .unwrap();
        let forged = make_keys("other", "iss", "aud")
            .issue(Uuid::new_v4())
            .unwrap();
        let a = keys.verify(&expired).unwrap_err().to_string();
        let b = keys.verify(&forged).unwrap_err().to_string();
        assert_eq!(a, b);
    }
}
