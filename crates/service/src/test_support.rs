#![cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use models::User;

use crate::auth::context::{CancelHandle, RequestContext};
use crate::auth::domain::RegisterInput;
use crate::auth::errors::AuthError;
use crate::auth::password::HashingParams;
use crate::auth::repository::UserRepo;
use crate::auth::service::AuthConfig;
use crate::auth::token::{Claims, JwtTokenIssuer, TokenIssuer};
use crate::errors::{StoreError, UniqueField};

/// Cheapest parameters argon2 accepts; keeps hashing out of test runtimes.
pub fn fast_hashing() -> HashingParams {
    HashingParams { memory_kib: 8, iterations: 1, parallelism: 1 }
}

pub fn fast_config() -> AuthConfig {
    AuthConfig { hashing: fast_hashing(), ..AuthConfig::default() }
}

pub fn test_issuer() -> Arc<dyn TokenIssuer> {
    Arc::new(JwtTokenIssuer::new("test-secret", "twitter", chrono::Duration::hours(1)))
}

pub fn register_input(username: &str, email: &str, password: &str) -> RegisterInput {
    RegisterInput {
        email: email.into(),
        username: username.into(),
        password: password.into(),
        confirm_password: password.into(),
    }
}

#[derive(Debug, Clone, Copy)]
pub enum FailOn {
    Lookup,
    Create,
    CreateDuplicate(UniqueField),
}

/// Store double: every lookup misses, and the configured call fails.
pub struct FailingUserRepo {
    fail_on: FailOn,
    creates: AtomicUsize,
}

impl FailingUserRepo {
    pub fn new(fail_on: FailOn) -> Self { Self { fail_on, creates: AtomicUsize::new(0) } }

    pub fn create_calls(&self) -> usize { self.creates.load(Ordering::SeqCst) }

    fn lookup(&self) -> Result<User, StoreError> {
        match self.fail_on {
            FailOn::Lookup => Err(StoreError::Backend("connection reset".into())),
            _ => Err(StoreError::NotFound),
        }
    }
}

#[async_trait]
impl UserRepo for FailingUserRepo {
    async fn get_by_username(&self, _ctx: &RequestContext, _username: &str) -> Result<User, StoreError> {
        self.lookup()
    }

    async fn get_by_email(&self, _ctx: &RequestContext, _email: &str) -> Result<User, StoreError> {
        self.lookup()
    }

    async fn create(&self, _ctx: &RequestContext, user: User) -> Result<User, StoreError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        match self.fail_on {
            FailOn::Create => Err(StoreError::Backend("disk full".into())),
            FailOn::CreateDuplicate(field) => Err(StoreError::Duplicate(field)),
            FailOn::Lookup => Ok(user),
        }
    }
}

/// Issuer whose signing backend is always down.
pub struct FailingTokenIssuer;

impl TokenIssuer for FailingTokenIssuer {
    fn issue(&self, _user: &User) -> Result<String, AuthError> {
        Err(AuthError::Token("signing key unavailable".into()))
    }

    fn verify(&self, _token: &str) -> Result<Claims, AuthError> {
        Err(AuthError::Token("signing key unavailable".into()))
    }
}

/// Empty store that cancels the request while the email lookup is in flight.
pub struct CancelOnEmailLookup {
    handle: CancelHandle,
    email_lookups: AtomicUsize,
    creates: AtomicUsize,
}

impl CancelOnEmailLookup {
    pub fn new(handle: CancelHandle) -> Self {
        Self { handle, email_lookups: AtomicUsize::new(0), creates: AtomicUsize::new(0) }
    }

    pub fn email_lookups(&self) -> usize { self.email_lookups.load(Ordering::SeqCst) }

    pub fn create_calls(&self) -> usize { self.creates.load(Ordering::SeqCst) }
}

#[async_trait]
impl UserRepo for CancelOnEmailLookup {
    async fn get_by_username(&self, _ctx: &RequestContext, _username: &str) -> Result<User, StoreError> {
        Err(StoreError::NotFound)
    }

    async fn get_by_email(&self, _ctx: &RequestContext, _email: &str) -> Result<User, StoreError> {
        self.email_lookups.fetch_add(1, Ordering::SeqCst);
        self.handle.cancel();
        Err(StoreError::NotFound)
    }

    async fn create(&self, _ctx: &RequestContext, user: User) -> Result<User, StoreError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        Ok(user)
    }
}
