use lazy_static::lazy_static;
use regex::Regex;

pub const MIN_PASSWORD_CHARS: usize = 6;
pub const MAX_BIO_CHARS: usize = 250;

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn password_long_enough(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_CHARS
}

pub fn bio_fits(bio: &str) -> bool {
    bio.chars().count() <= MAX_BIO_CHARS
}

/// `None` for absent or blank text fields; trims what is kept.
pub fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Like [`present`] but keeps the value verbatim; passwords are not trimmed.
pub fn present_secret(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
