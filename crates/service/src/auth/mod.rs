//! Auth module: registration and login for user accounts.
//!
//! Layers: `domain` inputs and their sanitize/validate rules, the `repository`
//! store capability with its adapters in `repo`, password hashing and token
//! issuance, and `service`, which runs the workflows.

pub mod context;
pub mod domain;
pub mod errors;
pub mod password;
pub mod repo;
pub mod repository;
pub mod service;
pub mod token;
pub mod validation;

pub use context::RequestContext;
pub use domain::{AuthResponse, LoginInput, RegisterInput};
pub use errors::{AuthError, AuthErrorKind};
pub use service::{AuthConfig, AuthService};
