use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;
use uuid::Uuid;

use super::cookie::read_token;
use crate::{error::ApiError, state::AppState};

/// Reads the `token` cookie, validates the JWT and yields the user ID.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = read_token(&jar)
            .ok_or_else(|| ApiError::Unauthorized("Not authorized, please login".into()))?;

        let claims = state.jwt.verify(&token).map_err(|_| {
            warn!("invalid or expired session token");
            ApiError::Unauthorized("Not authorized, please login".into())
        })?;

        Ok(AuthUser(claims.id))
    }
}
