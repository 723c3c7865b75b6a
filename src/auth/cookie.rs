use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::{Duration, OffsetDateTime};

pub const TOKEN_COOKIE: &str = "token";

/// `token` cookie carrying a freshly issued JWT.
pub fn session_cookie(token: String, ttl: Duration) -> Cookie<'static> {
    let mut cookie = base_cookie(token);
    cookie.set_expires(OffsetDateTime::now_utc() + ttl);
    cookie
}

/// Empty `token` cookie that expired at the Unix epoch, so the browser drops it.
pub fn cleared_cookie() -> Cookie<'static> {
    let mut cookie = base_cookie(String::new());
    cookie.set_expires(OffsetDateTime::UNIX_EPOCH);
    cookie
}

pub fn read_token(jar: &CookieJar) -> Option<String> {
    jar.get(TOKEN_COOKIE)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty())
}

fn base_cookie(value: String) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::None)
        .secure(true)
        .build()
}
