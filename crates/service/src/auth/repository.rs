use async_trait::async_trait;
use models::User;

use super::context::RequestContext;
use crate::errors::{StoreError, UniqueField};

/// User store capability used by the auth workflows.
///
/// Lookups return `StoreError::NotFound` when absent. `create` must reject a
/// username or email that already exists with `StoreError::Duplicate`, which
/// closes the window between the service's lookups and its write.
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn get_by_username(&self, ctx: &RequestContext, username: &str) -> Result<User, StoreError>;
    async fn get_by_email(&self, ctx: &RequestContext, email: &str) -> Result<User, StoreError>;
    async fn create(&self, ctx: &RequestContext, user: User) -> Result<User, StoreError>;
}

/// Uniqueness rule shared by the store implementations in this crate.
pub(crate) fn check_unique<'a>(existing: impl IntoIterator<Item = &'a User>, user: &User) -> Result<(), StoreError> {
    for u in existing {
        if u.username == user.username {
            return Err(StoreError::Duplicate(UniqueField::Username));
        }
        if u.email == user.email {
            return Err(StoreError::Duplicate(UniqueField::Email));
        }
    }
    Ok(())
}

/// Simple in-memory repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::RwLock;
    use uuid::Uuid;

    #[derive(Default)]
    pub struct InMemoryUserRepo {
        users: RwLock<HashMap<Uuid, User>>,
        lookups: AtomicUsize,
        creates: AtomicUsize,
    }

    impl InMemoryUserRepo {
        /// Number of lookup calls served, found or not.
        pub fn lookup_calls(&self) -> usize { self.lookups.load(Ordering::SeqCst) }

        /// Number of `create` calls attempted, including rejected ones.
        pub fn create_calls(&self) -> usize { self.creates.load(Ordering::SeqCst) }

        pub async fn len(&self) -> usize { self.users.read().await.len() }

        pub async fn is_empty(&self) -> bool { self.users.read().await.is_empty() }

        pub async fn all(&self) -> Vec<User> { self.users.read().await.values().cloned().collect() }

        async fn find(&self, pred: impl Fn(&User) -> bool) -> Result<User, StoreError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            let users = self.users.read().await;
            users.values().find(|u| pred(u)).cloned().ok_or(StoreError::NotFound)
        }
    }

    #[async_trait]
    impl UserRepo for InMemoryUserRepo {
        async fn get_by_username(&self, _ctx: &RequestContext, username: &str) -> Result<User, StoreError> {
            self.find(|u| u.username == username).await
        }

        async fn get_by_email(&self, _ctx: &RequestContext, email: &str) -> Result<User, StoreError> {
            self.find(|u| u.email == email).await
        }

        async fn create(&self, _ctx: &RequestContext, user: User) -> Result<User, StoreError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            let mut users = self.users.write().await;
            check_unique(users.values(), &user)?;
            users.insert(user.id, user.clone());
            Ok(user)
        }
    }

}
