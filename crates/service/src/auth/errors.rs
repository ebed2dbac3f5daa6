use thiserror::Error;

use crate::errors::StoreError;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("username taken")]
    UsernameTaken,
    #[error("email taken")]
    EmailTaken,
    #[error("user not found")]
    NotFound,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("request cancelled")]
    Cancelled,
    #[error("hashing error: {0}")]
    Hash(String),
    #[error("token error: {0}")]
    Token(String),
    /// Store failure; only `context` is displayed, the store detail stays in `source`.
    #[error("{context}")]
    Storage {
        context: &'static str,
        #[source]
        source: StoreError,
    },
}

/// Tag for each `AuthError` variant, used for "is-a" checks without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    Validation,
    UsernameTaken,
    EmailTaken,
    NotFound,
    InvalidCredentials,
    Cancelled,
    Hash,
    Token,
    Storage,
}

impl AuthError {
    pub fn validation(msg: impl Into<String>) -> Self { Self::Validation(msg.into()) }

    pub fn storage(context: &'static str, source: StoreError) -> Self { Self::Storage { context, source } }

    pub fn kind(&self) -> AuthErrorKind {
        match self {
            AuthError::Validation(_) => AuthErrorKind::Validation,
            AuthError::UsernameTaken => AuthErrorKind::UsernameTaken,
            AuthError::EmailTaken => AuthErrorKind::EmailTaken,
            AuthError::NotFound => AuthErrorKind::NotFound,
            AuthError::InvalidCredentials => AuthErrorKind::InvalidCredentials,
            AuthError::Cancelled => AuthErrorKind::Cancelled,
            AuthError::Hash(_) => AuthErrorKind::Hash,
            AuthError::Token(_) => AuthErrorKind::Token,
            AuthError::Storage { .. } => AuthErrorKind::Storage,
        }
    }

    pub fn is(&self, kind: AuthErrorKind) -> bool { self.kind() == kind }

    /// Errors whose message may be shown to the end user as-is.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self.kind(),
            AuthErrorKind::Validation
                | AuthErrorKind::UsernameTaken
                | AuthErrorKind::EmailTaken
                | AuthErrorKind::InvalidCredentials
        )
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self.kind() {
            AuthErrorKind::Validation => 1001,
            AuthErrorKind::UsernameTaken => 1002,
            AuthErrorKind::EmailTaken => 1003,
            AuthErrorKind::NotFound => 1004,
            AuthErrorKind::InvalidCredentials => 1005,
            AuthErrorKind::Cancelled => 1006,
            AuthErrorKind::Hash => 1101,
            AuthErrorKind::Token => 1102,
            AuthErrorKind::Storage => 1200,
        }
    }
}
