//! Field rules for registration and login input.

use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_USERNAME_MIN_LENGTH: usize = 2;
pub const DEFAULT_PASSWORD_MIN_LENGTH: usize = 6;

/// local-part@domain, where each domain label is 1..=63 alphanumerics/hyphens
/// and never starts or ends with a hyphen.
const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$";

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"));

/// Minimum lengths, counted in Unicode scalar values rather than UTF-8 bytes,
/// so "ééé" is three characters long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationRules {
    pub username_min_length: usize,
    pub password_min_length: usize,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self { username_min_length: DEFAULT_USERNAME_MIN_LENGTH, password_min_length: DEFAULT_PASSWORD_MIN_LENGTH }
    }
}

impl From<&configs::AuthSettings> for ValidationRules {
    fn from(s: &configs::AuthSettings) -> Self {
        Self { username_min_length: s.username_min_length, password_min_length: s.password_min_length }
    }
}

impl ValidationRules {
    pub fn username_long_enough(&self, username: &str) -> bool {
        username.chars().count() >= self.username_min_length
    }

    pub fn password_long_enough(&self, password: &str) -> bool {
        password.chars().count() >= self.password_min_length
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}
