use std::{net::SocketAddr, str::FromStr};

use anyhow::{ensure, Context};
use secrecy::SecretString;

/// Upper bound for `JWT_TTL_HOURS`: one year.
pub const MAX_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: SecretString,
    pub issuer: String,
    pub audience: String,
    pub ttl_hours: i64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub jwt: JwtConfig,
    pub host: String,
    pub port: u16,
    /// Origin of the single-page front end; enables credentialed CORS for it.
    pub frontend_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = get("DATABASE_URL").context("DATABASE_URL is not set")?;
        let ttl_hours: i64 = parse_or(&get, "JWT_TTL_HOURS", 24)?;
        ensure!(
            (1..=MAX_TTL_HOURS).contains(&ttl_hours),
            "JWT_TTL_HOURS must be between 1 and {MAX_TTL_HOURS}, got {ttl_hours}"
        );
        let jwt = JwtConfig {
            secret: get("JWT_SECRET")
                .filter(|s| !s.is_empty())
                .map(SecretString::from)
                .context("JWT_SECRET is not set")?,
            issuer: get("JWT_ISSUER").unwrap_or_else(|| "userauth".into()),
            audience: get("JWT_AUDIENCE").unwrap_or_else(|| "userauth-web".into()),
            ttl_hours,
        };
        Ok(Self {
            database_url,
            max_connections: parse_or(&get, "DATABASE_MAX_CONNECTIONS", 10)?,
            jwt,
            host: get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&get, "APP_PORT", 8080)?,
            frontend_url: get("FRONTEND_URL").filter(|s| !s.is_empty()),
        })
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        None => Ok(default),
    }
}
