use std::fmt;

use models::User;
use serde::{Deserialize, Serialize, Serializer};

use super::errors::AuthError;
use super::validation::{is_valid_email, ValidationRules};

/// Registration input
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

/// Login input
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Successful register/login result. The user is serialized without its hash.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(serialize_with = "serialize_profile")]
    pub user: User,
}

fn serialize_profile<S: Serializer>(user: &User, s: S) -> Result<S::Ok, S::Error> {
    user.profile().serialize(s)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl RegisterInput {
    /// Trim email and username, lowercase email. Passwords are left as typed.
    pub fn sanitize(&mut self) {
        self.email = normalize_email(&self.email);
        self.username = self.username.trim().to_string();
    }

    /// Checks run in a fixed order; the first failure is returned.
    pub fn validate(&self, rules: &ValidationRules) -> Result<(), AuthError> {
        if !rules.username_long_enough(&self.username) {
            return Err(AuthError::validation(format!(
                "username not long enough, require at least ({}) characters",
                rules.username_min_length
            )));
        }
        if !is_valid_email(&self.email) {
            return Err(AuthError::validation("email invalid"));
        }
        if !rules.password_long_enough(&self.password) {
            return Err(AuthError::validation(format!(
                "password not long enough, require at least ({}) characters",
                rules.password_min_length
            )));
        }
        if self.password != self.confirm_password {
            return Err(AuthError::validation("confirm password must match the password"));
        }
        Ok(())
    }
}

impl LoginInput {
    pub fn sanitize(&mut self) {
        self.email = normalize_email(&self.email);
    }

    pub fn validate(&self) -> Result<(), AuthError> {
        if !is_valid_email(&self.email) {
            return Err(AuthError::validation("email invalid"));
        }
        if self.password.is_empty() {
            return Err(AuthError::validation("password required"));
        }
        Ok(())
    }
}

impl fmt::Debug for RegisterInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterInput")
            .field("email", &self.email)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginInput").field("email", &self.email).finish_non_exhaustive()
    }
}
