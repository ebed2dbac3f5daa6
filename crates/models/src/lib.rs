//! Persistent records shared between the auth service and its stores.

pub mod user;

pub use user::{User, UserProfile};
