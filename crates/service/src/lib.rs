//! Service layer for account registration and login.
//! - Keeps business rules independent of transport and storage.
//! - Stores are injected through the `UserRepo` trait.
//! - Errors are typed enums with stable codes.

pub mod errors;
pub mod auth;
#[cfg(test)]
pub mod test_support;
pub mod storage;
