use std::fmt;

use thiserror::Error;

/// Which unique column a store write collided on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueField::Username => f.write_str("username"),
            UniqueField::Email => f.write_str("email"),
        }
    }
}

/// Errors raised by user store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("duplicate {0}")]
    Duplicate(UniqueField),
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(e: impl fmt::Display) -> Self { Self::Backend(e.to_string()) }

    pub fn is_not_found(&self) -> bool { matches!(self, StoreError::NotFound) }
}
